//! services/api/src/web/middleware.rs
//!
//! Authentication and role middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use reading_tracker_core::domain::{Role, User};
use reading_tracker_core::ports::PortError;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Middleware that validates the `Authorization: Bearer <token>` header and
/// resolves the caller.
///
/// If valid, inserts the `User` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(PortError::Unauthorized)?;

    // 2. Verify it and load the user it names
    let user = state.auth.authenticate(token).await?;

    // 3. Insert the user into request extensions
    req.extensions_mut().insert(user);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Middleware that lets the request through only when the authenticated user
/// holds `required`. Must run after `require_auth`.
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or(PortError::Unauthorized)?;

    if user.role != required {
        warn!(
            user_id = %user.id,
            role = %user.role,
            required = %required,
            "Rejected request lacking the required role"
        );
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}
