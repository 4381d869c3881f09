use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use super::parse_id;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{progress, ApiResponse};
use crate::repositories::{EquipmentRepository, ExerciseRepository};

#[derive(Clone)]
pub struct ProgressState {
    pub equipment_repo: EquipmentRepository,
    pub exercise_repo: ExerciseRepository,
}

pub async fn show(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let equipment_id = parse_id(&id, "Invalid equipment Id")?;

    let equipment = state
        .equipment_repo
        .find_by_id(equipment_id)
        .await?
        .filter(|e| e.user_id == auth_user.user.id)
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let exercises = state
        .exercise_repo
        .find_by_equipment_with_sessions(equipment.id)
        .await?;

    let progress = progress::summarize(equipment.id, exercises);

    tracing::debug!(
        equipment_id,
        exercises = progress.exercises.len(),
        max_weight = progress.max_weight,
        total_volume = progress.total_volume,
        "Computed progress"
    );

    Ok(Json(ApiResponse::new(progress, "Progress retrieved successfully")).into_response())
}
