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
use crate::models::{ApiResponse, EquipmentForm, EquipmentWithMuscles};
use crate::repositories::EquipmentRepository;

const INVALID_ID: &str = "Invalid equipment Id";

#[derive(Clone)]
pub struct EquipmentState {
    pub equipment_repo: EquipmentRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Equipment not found".to_string())
}

fn name_conflict(name: &str, err: AppError) -> AppError {
    if err.status() == StatusCode::CONFLICT {
        AppError::Conflict(format!("Equipment named '{}' already exists", name))
    } else {
        err
    }
}

async fn find_owned(
    state: &EquipmentState,
    auth_user: &AuthUser,
    id: i64,
) -> Result<EquipmentWithMuscles> {
    let equipment = state
        .equipment_repo
        .find_with_muscles(id)
        .await?
        .ok_or_else(not_found)?;

    if equipment.equipment.user_id != auth_user.user.id {
        return Err(not_found());
    }

    Ok(equipment)
}

pub async fn create(
    State(state): State<EquipmentState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<EquipmentForm>,
) -> Result<Response> {
    let input = form.validate().map_err(AppError::Validation)?;
    let name = input.name.clone();

    let equipment = state
        .equipment_repo
        .create(auth_user.user.id, input)
        .await
        .map_err(|e| name_conflict(&name, e))?;

    tracing::info!(
        user_id = auth_user.user.id,
        equipment_id = equipment.equipment.id,
        "Created equipment"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(equipment, "Equipment created successfully")),
    )
        .into_response())
}

pub async fn list(State(state): State<EquipmentState>, auth_user: AuthUser) -> Result<Response> {
    let equipment = state.equipment_repo.find_by_user(auth_user.user.id).await?;

    Ok(Json(ApiResponse::new(equipment, "Equipment retrieved successfully")).into_response())
}

pub async fn show(
    State(state): State<EquipmentState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;
    let equipment = find_owned(&state, &auth_user, id).await?;

    Ok(Json(ApiResponse::new(equipment, "Equipment retrieved successfully")).into_response())
}

pub async fn update(
    State(state): State<EquipmentState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(form): AppJson<EquipmentForm>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;
    let input = form.validate().map_err(AppError::Validation)?;
    let name = input.name.clone();

    let updated = state
        .equipment_repo
        .update(id, auth_user.user.id, input)
        .await
        .map_err(|e| name_conflict(&name, e))?;
    if !updated {
        return Err(not_found());
    }

    let equipment = find_owned(&state, &auth_user, id).await?;

    Ok(Json(ApiResponse::new(equipment, "Equipment updated successfully")).into_response())
}

pub async fn delete(
    State(state): State<EquipmentState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id, INVALID_ID)?;

    if !state.equipment_repo.delete(id, auth_user.user.id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth_user.user.id, equipment_id = id, "Deleted equipment");

    Ok(Json(ApiResponse::new(
        serde_json::Value::Null,
        "Equipment deleted successfully",
    ))
    .into_response())
}
