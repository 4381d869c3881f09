use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{query_optional, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let user = query_optional(&conn, "SELECT * FROM users WHERE id = ?", [id])?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let email = normalize_email(email);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let user = query_optional(&conn, "SELECT * FROM users WHERE email = ?", [&email])?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, email: &str, username: &str, password: &str) -> Result<User> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        let email = normalize_email(email);
        let username = username.trim().to_string();
        let now = Utc::now();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (email, username, password_hash, created_at)
                 VALUES (?, ?, ?, ?)",
                rusqlite::params![email, username, password_hash, now],
            )?;

            Ok(User {
                id: conn.last_insert_rowid(),
                email,
                username,
                password_hash,
                created_at: now,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(valid.then_some(user))
    }

    /// Delete the user together with everything they logged.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM sets WHERE workout_exercise_id IN (
                    SELECT we.id FROM workout_exercises we
                    JOIN workout_sessions ws ON we.workout_session_id = ws.id
                    WHERE ws.user_id = ?1
                 ) OR workout_exercise_id IN (
                    SELECT we.id FROM workout_exercises we
                    JOIN equipment e ON we.equipment_id = e.id
                    WHERE e.user_id = ?1
                 )",
                [id],
            )?;
            tx.execute(
                "DELETE FROM workout_exercises
                 WHERE workout_session_id IN (SELECT id FROM workout_sessions WHERE user_id = ?1)
                    OR equipment_id IN (SELECT id FROM equipment WHERE user_id = ?1)",
                [id],
            )?;
            tx.execute("DELETE FROM workout_sessions WHERE user_id = ?", [id])?;
            tx.execute(
                "DELETE FROM target_muscles
                 WHERE equipment_id IN (SELECT id FROM equipment WHERE user_id = ?)",
                [id],
            )?;
            tx.execute("DELETE FROM equipment WHERE user_id = ?", [id])?;
            let rows = tx.execute("DELETE FROM users WHERE id = ?", [id])?;

            tx.commit()?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
