//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, JwtTokenService, Pbkdf2Hasher},
    config::{Config, Environment, Storage},
    error::ApiError,
    web::{create_router, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Security Adapters ---
    let hasher = Arc::new(Pbkdf2Hasher::new(config.password_salt.clone()));
    let tokens = Arc::new(JwtTokenService::new(&config.jwt_secret, config.jwt_expires_in));

    // --- 3. Connect to Storage & Run Migrations ---
    let app_state = match &config.storage {
        Storage::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown.");
            AppState::in_memory(hasher, tokens)
        }
        Storage::Postgres {
            url,
            max_connections,
        } => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(url)
                .await?;
            let db_adapter = Arc::new(DbAdapter::new(db_pool));
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            AppState::new(
                db_adapter.clone(),
                db_adapter.clone(),
                db_adapter,
                hasher,
                tokens,
            )
        }
    };

    // --- 4. Seed the Administrator Account ---
    if let Some(seed) = &config.admin_seed {
        app_state.auth.ensure_admin(&seed.email, &seed.password).await?;
    }

    // --- 5. Create the Web Router ---
    let cors = match &config.cors_origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|e| {
                ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", origin, e))
            })?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
        }
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
    .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let mut app: Router = create_router(Arc::new(app_state));
    if config.environment == Environment::Development {
        app = app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        info!("Swagger UI available at http://{}/docs", config.bind_address);
    }
    let app = app.layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
