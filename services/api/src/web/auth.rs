//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration and login.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::web::extract::ApiJson;
use crate::web::state::AppState;
use crate::web::validation::{validate_login, validate_register};

// Auth replies carry `{user, token}` at the top level rather than inside the envelope.

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let credentials = validate_register(req)?;
    let outcome = state
        .auth
        .register(&credentials.email, &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid payload or credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = validate_login(req)?;
    let outcome = state
        .auth
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(outcome.into()))
}
