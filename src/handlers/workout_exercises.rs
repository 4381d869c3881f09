use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::parse_id;
use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::{ApiResponse, CreateWorkoutExercise, WorkoutExerciseWithSets};
use crate::repositories::{EquipmentRepository, ExerciseRepository, WorkoutRepository};

const INVALID_ID: &str = "Invalid workout exercise Id";

#[derive(Clone)]
pub struct WorkoutExercisesState {
    pub exercise_repo: ExerciseRepository,
    pub equipment_repo: EquipmentRepository,
    pub workout_repo: WorkoutRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout exercise not found".to_string())
}

/// Load the exercise if its session belongs to the caller.
async fn find_owned(
    state: &WorkoutExercisesState,
    auth_user: &AuthUser,
    id: i64,
) -> Result<WorkoutExerciseWithSets> {
    let exercise = state
        .exercise_repo
        .find_with_sets(id)
        .await?
        .ok_or_else(not_found)?;

    let owned = state
        .workout_repo
        .find_session_by_id(exercise.exercise.workout_session_id)
        .await?
        .is_some_and(|session| session.user_id == auth_user.user.id);
    if !owned {
        return Err(not_found());
    }

    Ok(exercise)
}

pub async fn create(
    State(state): State<WorkoutExercisesState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<CreateWorkoutExercise>,
) -> Result<Response> {
    let (equipment_id, session_id) = form.validate().map_err(AppError::Validation)?;

    state
        .equipment_repo
        .find_by_id(equipment_id)
        .await?
        .filter(|e| e.user_id == auth_user.user.id)
        .ok_or_else(|| AppError::NotFound("Equipment not found for this user".to_string()))?;

    state
        .workout_repo
        .find_session_by_id(session_id)
        .await?
        .filter(|s| s.user_id == auth_user.user.id)
        .ok_or_else(|| {
            AppError::NotFound("Workout session not found for this user".to_string())
        })?;

    let exercise = state
        .exercise_repo
        .create(session_id, equipment_id, form.notes.as_deref(), form.sets)
        .await?;

    tracing::info!(
        user_id = auth_user.user.id,
        session_id,
        equipment_id,
        sets = exercise.sets.len(),
        "Logged workout exercise"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            exercise,
            "Workout exercise created successfully",
        )),
    )
        .into_response())
}

pub async fn show(
    State(state): State<WorkoutExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;
    let exercise = find_owned(&state, &auth_user, id).await?;

    Ok(Json(ApiResponse::new(
        exercise,
        "Workout exercise retrieved successfully",
    ))
    .into_response())
}

pub async fn delete(
    State(state): State<WorkoutExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;
    find_owned(&state, &auth_user, id).await?;

    if !state.exercise_repo.delete(id).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::new(
        serde_json::Value::Null,
        "Workout exercise deleted successfully",
    ))
    .into_response())
}
