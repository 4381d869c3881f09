use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: String,
    version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "API is healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: GIT_VERSION,
    })
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Gym Tracker",
        "version": GIT_VERSION,
        "endpoints": {
            "health": "/api/v1/health",
            "users": "/api/v1/users",
            "equipments": "/api/v1/equipments",
            "workouts": "/api/v1/workouts",
            "workoutExercises": "/api/v1/workout/exercises",
            "progress": "/api/v1/progress/{equipmentId}",
        },
    }))
}
