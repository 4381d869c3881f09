use chrono::Utc;
use rusqlite::Connection;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    query_all, query_optional, ExerciseWithSession, FromSqliteRow, NewSet, WorkoutExercise,
    WorkoutExerciseWithSets, WorkoutSession, WorkoutSet,
};

/// Workout exercises and the sets logged under them.
#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

pub(crate) fn load_sets(
    conn: &Connection,
    workout_exercise_id: i64,
) -> rusqlite::Result<Vec<WorkoutSet>> {
    query_all(
        conn,
        "SELECT * FROM sets WHERE workout_exercise_id = ? ORDER BY set_number",
        [workout_exercise_id],
    )
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the exercise and its sets, numbered 1..n in the given order.
    pub async fn create(
        &self,
        workout_session_id: i64,
        equipment_id: i64,
        notes: Option<&str>,
        sets: Vec<NewSet>,
    ) -> Result<WorkoutExerciseWithSets> {
        let pool = self.pool.clone();
        let notes = notes.map(|s| s.to_string());
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO workout_exercises (workout_session_id, equipment_id, notes, created_at)
                 VALUES (?, ?, ?, ?)",
                rusqlite::params![workout_session_id, equipment_id, notes, now],
            )?;
            let id = tx.last_insert_rowid();

            let mut created_sets = Vec::with_capacity(sets.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO sets (workout_exercise_id, set_number, reps, weight)
                     VALUES (?, ?, ?, ?)",
                )?;
                for (i, set) in sets.iter().enumerate() {
                    let set_number = i as i32 + 1;
                    stmt.execute(rusqlite::params![id, set_number, set.reps, set.weight])?;
                    created_sets.push(WorkoutSet {
                        id: tx.last_insert_rowid(),
                        workout_exercise_id: id,
                        set_number,
                        reps: set.reps,
                        weight: set.weight,
                    });
                }
            }

            tx.commit()?;

            Ok(WorkoutExerciseWithSets {
                exercise: WorkoutExercise {
                    id,
                    workout_session_id,
                    equipment_id,
                    notes,
                    created_at: now,
                },
                sets: created_sets,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_with_sets(&self, id: i64) -> Result<Option<WorkoutExerciseWithSets>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let exercise: Option<WorkoutExercise> =
                query_optional(&conn, "SELECT * FROM workout_exercises WHERE id = ?", [id])?;

            let result = match exercise {
                Some(exercise) => {
                    let sets = load_sets(&conn, exercise.id)?;
                    Some(WorkoutExerciseWithSets { exercise, sets })
                }
                None => None,
            };
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Every exercise logged with `equipment_id`, with sets and session.
    pub async fn find_by_equipment_with_sessions(
        &self,
        equipment_id: i64,
    ) -> Result<Vec<ExerciseWithSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let exercises: Vec<WorkoutExercise> = query_all(
                &conn,
                "SELECT we.* FROM workout_exercises we
                 JOIN workout_sessions ws ON we.workout_session_id = ws.id
                 WHERE we.equipment_id = ?
                 ORDER BY ws.date, we.id",
                [equipment_id],
            )?;

            let mut result = Vec::with_capacity(exercises.len());
            for exercise in exercises {
                let sets = load_sets(&conn, exercise.id)?;
                let workout_session = conn.query_row(
                    "SELECT * FROM workout_sessions WHERE id = ?",
                    [exercise.workout_session_id],
                    WorkoutSession::from_row,
                )?;
                result.push(ExerciseWithSession {
                    exercise,
                    sets,
                    workout_session,
                });
            }
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM sets WHERE workout_exercise_id = ?", [id])?;
            let rows = tx.execute("DELETE FROM workout_exercises WHERE id = ?", [id])?;

            tx.commit()?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
