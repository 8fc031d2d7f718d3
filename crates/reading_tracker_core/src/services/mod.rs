//! Application services. Each one is constructed once with the ports it needs
//! and shared behind an `Arc` by the web layer.

pub mod auth;
pub mod books;
pub mod readings;
pub mod recommend;

pub use auth::AuthService;
pub use books::BookCatalog;
pub use readings::IntervalRecorder;
pub use recommend::{Recommender, DEFAULT_TOP_BOOKS};
