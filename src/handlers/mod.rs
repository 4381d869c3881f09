pub mod equipment;
pub mod health;
pub mod progress;
pub mod users;
pub mod workout_exercises;
pub mod workouts;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Parse a numeric path id, rejecting anything else with `message`.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// Decode a JSON body whose fields are all optional; an empty body means defaults.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}
