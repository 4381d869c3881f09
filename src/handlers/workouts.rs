use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::{optional_json, parse_id};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ApiResponse, CreateWorkoutSession, EndWorkoutSession, WorkoutSessionDetail};
use crate::repositories::WorkoutRepository;

const INVALID_ID: &str = "Invalid workout session Id";

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout session not found".to_string())
}

/// Start a session; an empty body starts one dated now.
pub async fn create(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    body: Bytes,
) -> Result<Response> {
    let form: CreateWorkoutSession = optional_json(&body)?;
    form.validate().map_err(AppError::Validation)?;

    let session = state
        .workout_repo
        .create_session(auth_user.user.id, form)
        .await?;

    tracing::info!(
        user_id = auth_user.user.id,
        session_id = session.id,
        "Created workout session"
    );

    let detail = WorkoutSessionDetail {
        session,
        workout_exercises: Vec::new(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            detail,
            "Workout Session created successfully",
        )),
    )
        .into_response())
}

pub async fn list(State(state): State<WorkoutsState>, auth_user: AuthUser) -> Result<Response> {
    let sessions = state
        .workout_repo
        .find_sessions_by_user(auth_user.user.id)
        .await?;

    Ok(Json(ApiResponse::new(sessions, "Workouts retrieved successfully")).into_response())
}

pub async fn show(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;

    let workout = state
        .workout_repo
        .find_session_detail(id)
        .await?
        .ok_or_else(not_found)?;

    // Other users' sessions look missing
    if workout.session.user_id != auth_user.user.id {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::new(workout, "Workout retrieved successfully")).into_response())
}

/// Set the end time; an empty body ends the session now.
pub async fn end(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;

    let form: EndWorkoutSession = optional_json(&body)?;
    let end_time = form.end_time.unwrap_or_else(Utc::now);

    let session = state
        .workout_repo
        .find_session_by_id(id)
        .await?
        .filter(|s| s.user_id == auth_user.user.id)
        .ok_or_else(not_found)?;

    if let Some(start) = session.start_time {
        if end_time < start {
            return Err(AppError::Validation(
                "End time must not be before start time".to_string(),
            ));
        }
    }

    let updated = state
        .workout_repo
        .end_session(id, auth_user.user.id, end_time)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(ApiResponse::new(updated, "Workout updated successfully")).into_response())
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;

    if !state.workout_repo.delete_session(id, auth_user.user.id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth_user.user.id, session_id = id, "Deleted workout session");

    Ok(Json(ApiResponse::new(
        serde_json::Value::Null,
        "Workout deleted successfully",
    ))
    .into_response())
}
