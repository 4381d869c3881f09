use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    query_all, query_optional, CreateWorkoutSession, Equipment, ExerciseWithEquipment,
    WorkoutExercise, WorkoutSession, WorkoutSessionDetail,
};

use super::exercise_repo::load_sets;

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_session(
        &self,
        user_id: i64,
        input: CreateWorkoutSession,
    ) -> Result<WorkoutSession> {
        let pool = self.pool.clone();
        let now = Utc::now();
        let date = input.date.unwrap_or(now);

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_sessions (user_id, date, start_time, end_time, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    user_id,
                    date,
                    input.start_time,
                    input.end_time,
                    input.notes,
                    now
                ],
            )?;

            Ok(WorkoutSession {
                id: conn.last_insert_rowid(),
                user_id,
                date,
                start_time: input.start_time,
                end_time: input.end_time,
                notes: input.notes,
                created_at: now,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_session_by_id(&self, id: i64) -> Result<Option<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let session =
                query_optional(&conn, "SELECT * FROM workout_sessions WHERE id = ?", [id])?;
            Ok(session)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_sessions_by_user(&self, user_id: i64) -> Result<Vec<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sessions = query_all(
                &conn,
                "SELECT * FROM workout_sessions WHERE user_id = ? ORDER BY date DESC, id DESC",
                [user_id],
            )?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The session with its exercises, each carrying equipment and sets.
    pub async fn find_session_detail(&self, id: i64) -> Result<Option<WorkoutSessionDetail>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let Some(session) = query_optional::<WorkoutSession, _>(
                &conn,
                "SELECT * FROM workout_sessions WHERE id = ?",
                [id],
            )?
            else {
                return Ok(None);
            };

            let exercises: Vec<WorkoutExercise> = query_all(
                &conn,
                "SELECT * FROM workout_exercises WHERE workout_session_id = ? ORDER BY id",
                [id],
            )?;

            let mut workout_exercises = Vec::with_capacity(exercises.len());
            for exercise in exercises {
                let equipment: Equipment = query_optional(
                    &conn,
                    "SELECT * FROM equipment WHERE id = ?",
                    [exercise.equipment_id],
                )?
                .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
                let sets = load_sets(&conn, exercise.id)?;
                workout_exercises.push(ExerciseWithEquipment {
                    exercise,
                    equipment,
                    sets,
                });
            }

            Ok(Some(WorkoutSessionDetail {
                session,
                workout_exercises,
            }))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn end_session(
        &self,
        id: i64,
        user_id: i64,
        end_time: DateTime<Utc>,
    ) -> Result<Option<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE workout_sessions SET end_time = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![end_time, id, user_id],
            )?;
            if rows == 0 {
                return Ok(None);
            }

            let session =
                query_optional(&conn, "SELECT * FROM workout_sessions WHERE id = ?", [id])?;
            Ok(session)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete the session with its exercises and their sets.
    pub async fn delete_session(&self, id: i64, user_id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let owned: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM workout_sessions WHERE id = ? AND user_id = ?",
                [id, user_id],
                |row| row.get(0),
            )?;
            if !owned {
                return Ok(false);
            }

            tx.execute(
                "DELETE FROM sets WHERE workout_exercise_id IN
                    (SELECT id FROM workout_exercises WHERE workout_session_id = ?)",
                [id],
            )?;
            tx.execute(
                "DELETE FROM workout_exercises WHERE workout_session_id = ?",
                [id],
            )?;
            tx.execute("DELETE FROM workout_sessions WHERE id = ?", [id])?;

            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
