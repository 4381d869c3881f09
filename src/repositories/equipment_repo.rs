use chrono::Utc;
use rusqlite::Connection;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    query_all, query_optional, Equipment, EquipmentWithMuscles, TargetMuscle, ValidEquipment,
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: DbPool,
}

pub(crate) fn load_muscles(
    conn: &Connection,
    equipment_id: i64,
) -> rusqlite::Result<Vec<TargetMuscle>> {
    query_all(
        conn,
        "SELECT * FROM target_muscles WHERE equipment_id = ? ORDER BY id",
        [equipment_id],
    )
}

fn insert_muscles(
    conn: &Connection,
    equipment_id: i64,
    muscles: &[String],
) -> rusqlite::Result<()> {
    let mut stmt =
        conn.prepare("INSERT INTO target_muscles (equipment_id, muscle) VALUES (?, ?)")?;
    for muscle in muscles {
        stmt.execute(rusqlite::params![equipment_id, muscle])?;
    }
    Ok(())
}

fn with_muscles(
    conn: &Connection,
    equipment: Equipment,
) -> rusqlite::Result<EquipmentWithMuscles> {
    let target_muscles = load_muscles(conn, equipment.id)?;
    Ok(EquipmentWithMuscles {
        equipment,
        target_muscles,
    })
}

impl EquipmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        input: ValidEquipment,
    ) -> Result<EquipmentWithMuscles> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO equipment (user_id, name, type, description, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![user_id, input.name, input.kind, input.description, now, now],
            )?;
            let id = tx.last_insert_rowid();
            insert_muscles(&tx, id, input.muscles.as_deref().unwrap_or_default())?;

            let equipment = Equipment {
                id,
                user_id,
                name: input.name,
                kind: input.kind,
                description: input.description,
                created_at: now,
                updated_at: now,
            };
            let created = with_muscles(&tx, equipment)?;

            tx.commit()?;
            Ok(created)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Equipment>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let equipment = query_optional(&conn, "SELECT * FROM equipment WHERE id = ?", [id])?;
            Ok(equipment)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_with_muscles(&self, id: i64) -> Result<Option<EquipmentWithMuscles>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let equipment: Option<Equipment> =
                query_optional(&conn, "SELECT * FROM equipment WHERE id = ?", [id])?;
            let result = equipment.map(|e| with_muscles(&conn, e)).transpose()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<EquipmentWithMuscles>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let equipment: Vec<Equipment> = query_all(
                &conn,
                "SELECT * FROM equipment WHERE user_id = ? ORDER BY name",
                [user_id],
            )?;
            let result = equipment
                .into_iter()
                .map(|e| with_muscles(&conn, e))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Update fields; the muscle list is only replaced when one was given.
    pub async fn update(&self, id: i64, user_id: i64, input: ValidEquipment) -> Result<bool> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = tx.execute(
                "UPDATE equipment SET name = ?, type = ?, description = ?, updated_at = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![input.name, input.kind, input.description, now, id, user_id],
            )?;
            if rows == 0 {
                return Ok(false);
            }

            if let Some(muscles) = &input.muscles {
                tx.execute("DELETE FROM target_muscles WHERE equipment_id = ?", [id])?;
                insert_muscles(&tx, id, muscles)?;
            }

            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete the equipment, its muscles, and every exercise logged with it.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let owned: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM equipment WHERE id = ? AND user_id = ?",
                [id, user_id],
                |row| row.get(0),
            )?;
            if !owned {
                return Ok(false);
            }

            tx.execute(
                "DELETE FROM sets WHERE workout_exercise_id IN
                    (SELECT id FROM workout_exercises WHERE equipment_id = ?)",
                [id],
            )?;
            tx.execute("DELETE FROM workout_exercises WHERE equipment_id = ?", [id])?;
            tx.execute("DELETE FROM target_muscles WHERE equipment_id = ?", [id])?;
            tx.execute("DELETE FROM equipment WHERE id = ?", [id])?;

            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
