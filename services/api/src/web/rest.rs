//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the health probe.

use axum::Json;
use serde_json::{json, Value};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::dto::{
    AuthResponse, BookDto, BookRequest, LoginRequest, ReadingIntervalDto, RegisterRequest,
    SaveIntervalRequest, TokenDto, TopBookDto, UserDto,
};
use crate::web::envelope::PaginationDto;
use crate::web::{auth, books, readings};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        books::list_books_handler,
        books::top_books_handler,
        books::dashboard_list_books_handler,
        books::create_book_handler,
        books::update_book_handler,
        books::delete_book_handler,
        books::dashboard_top_books_handler,
        readings::save_interval_handler,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, UserDto, TokenDto, AuthResponse,
            BookRequest, BookDto, TopBookDto, PaginationDto,
            SaveIntervalRequest, ReadingIntervalDto,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Reading Recommendation System API", description = "Books, reading intervals and recommendations.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
