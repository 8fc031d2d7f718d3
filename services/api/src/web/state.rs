//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use reading_tracker_core::memory::InMemoryStore;
use reading_tracker_core::ports::{
    BookRepository, PasswordHasher, ReadingIntervalRepository, TokenService, UserRepository,
};
use reading_tracker_core::services::{AuthService, BookCatalog, IntervalRecorder, Recommender};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub books: Arc<BookCatalog>,
    pub readings: Arc<IntervalRecorder>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Wires the services onto the given repository and security adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        intervals: Arc<dyn ReadingIntervalRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, hasher, tokens)),
            books: Arc::new(BookCatalog::new(books.clone())),
            readings: Arc::new(IntervalRecorder::new(books.clone(), intervals.clone())),
            recommender: Arc::new(Recommender::new(books, intervals)),
        }
    }

    /// All three repositories served by one in-process store.
    pub fn in_memory(hasher: Arc<dyn PasswordHasher>, tokens: Arc<dyn TokenService>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store.clone(), store, hasher, tokens)
    }
}
