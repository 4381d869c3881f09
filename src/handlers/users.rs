use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::{ApiResponse, LoginCredentials, RegisterUser, User};
use crate::repositories::UserRepository;
use crate::token::TokenKeys;

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: UserRepository,
    pub token_keys: TokenKeys,
}

pub async fn register(
    State(state): State<UsersState>,
    AppJson(form): AppJson<RegisterUser>,
) -> Result<Response> {
    form.validate().map_err(AppError::Validation)?;

    if state.user_repo.find_by_email(&form.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let user = state
        .user_repo
        .create(&form.email, &form.username, &form.password)
        .await?;
    let token = state.token_keys.issue(&user)?;

    tracing::info!(user_id = user.id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(user, "User created successfully").with_token(token)),
    )
        .into_response())
}

pub async fn login(
    State(state): State<UsersState>,
    AppJson(credentials): AppJson<LoginCredentials>,
) -> Result<Response> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .user_repo
        .verify_password(&credentials.email, &credentials.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;
    let token = state.token_keys.issue(&user)?;

    Ok(Json(ApiResponse::new(user, "Logged in successfully").with_token(token)).into_response())
}

pub async fn me(auth_user: AuthUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::new(auth_user.user, "User retrieved successfully"))
}

pub async fn delete_me(State(state): State<UsersState>, auth_user: AuthUser) -> Result<Response> {
    if !state.user_repo.delete(auth_user.user.id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = auth_user.user.id, "Deleted user");

    Ok(Json(ApiResponse::new(
        serde_json::Value::Null,
        "User deleted successfully",
    ))
    .into_response())
}
