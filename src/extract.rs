use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection is rendered as an [`AppError`] envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
