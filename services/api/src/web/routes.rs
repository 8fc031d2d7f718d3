//! services/api/src/web/routes.rs
//!
//! Builds the versioned API router and its auth/role layers.

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use reading_tracker_core::domain::Role;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::web::auth::{login_handler, register_handler};
use crate::web::books::{
    create_book_handler, dashboard_list_books_handler, dashboard_top_books_handler,
    delete_book_handler, list_books_handler, top_books_handler, update_book_handler,
};
use crate::web::middleware::{require_auth, require_role};
use crate::web::readings::save_interval_handler;
use crate::web::rest::health_handler;
use crate::web::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Creates the application router. Swagger UI and CORS are added by the binary.
pub fn create_router(state: Arc<AppState>) -> Router {
    let authenticated = axum_middleware::from_fn_with_state(state.clone(), require_auth);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler));

    // Any authenticated caller
    let reader_routes = Router::new()
        .route("/books", get(list_books_handler))
        .route("/books/top-recommend", get(top_books_handler))
        .route_layer(authenticated.clone());

    // Role USER only
    let user_routes = Router::new()
        .route("/book-readings/save-interval", post(save_interval_handler))
        .route_layer(axum_middleware::from_fn_with_state(Role::User, require_role))
        .route_layer(authenticated.clone());

    // Role ADMIN only
    let dashboard_routes = Router::new()
        .route(
            "/dashboard/books",
            get(dashboard_list_books_handler).post(create_book_handler),
        )
        .route(
            "/dashboard/books/{id}",
            put(update_book_handler).delete(delete_book_handler),
        )
        .route("/dashboard/books/top-recommend", get(dashboard_top_books_handler))
        .route_layer(axum_middleware::from_fn_with_state(Role::Admin, require_role))
        .route_layer(authenticated);

    let api_router = Router::new()
        .merge(public_routes)
        .merge(reader_routes)
        .merge(user_routes)
        .merge(dashboard_routes);

    Router::new()
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
