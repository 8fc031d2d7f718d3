pub mod auth;
pub mod books;
pub mod dto;
pub mod envelope;
pub mod extract;
pub mod middleware;
pub mod readings;
pub mod rest;
pub mod routes;
pub mod state;
pub mod validation;

// Re-export the router builder to make it easily accessible
// to the binary and the integration tests.
pub use middleware::{require_auth, require_role};
pub use routes::create_router;
