//! crates/reading_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or token formats.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AccessToken, Book, BookDraft, BookFilter, BookReadTotal, NewReadingInterval, NewUser,
    PageRequest, Paginated, ReadingInterval, TokenClaims, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port and service operations.
/// This abstracts away the specific errors from external services (e.g., database, crypto).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PortError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidRange(String),
    #[error("{0}")]
    OverlapConflict(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Invalid Token")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Ports
//=========================================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up a non-deleted user.
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    /// Fails with `AlreadyExists` when the email is taken.
    async fn create(&self, user: NewUser) -> PortResult<User>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Looks up a non-deleted book.
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Book>>;

    /// Fails with `AlreadyExists` when the name is taken.
    async fn create(&self, draft: BookDraft) -> PortResult<Book>;

    /// Returns `None` when no non-deleted book has this id.
    async fn update(&self, id: Uuid, draft: BookDraft) -> PortResult<Option<Book>>;

    async fn list(&self, filter: &BookFilter, page: PageRequest) -> PortResult<Paginated<Book>>;

    /// Sets the deletion timestamp. Returns `false` when nothing matched.
    async fn soft_delete(&self, id: Uuid) -> PortResult<bool>;
}

#[async_trait]
pub trait ReadingIntervalRepository: Send + Sync {
    /// Non-deleted intervals of `(user_id, book_id)` that share a page with
    /// the closed range `[start_page, end_page]`.
    async fn find_overlapping(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        start_page: u32,
        end_page: u32,
    ) -> PortResult<Vec<ReadingInterval>>;

    async fn save(&self, interval: NewReadingInterval) -> PortResult<ReadingInterval>;

    /// Summed `end - start + 1` per book over non-deleted intervals of
    /// non-deleted books, largest first, at most `limit` entries.
    async fn aggregate_by_book(&self, limit: usize) -> PortResult<Vec<BookReadTotal>>;
}

//=========================================================================================
// Security Ports
//=========================================================================================

pub trait PasswordHasher: Send + Sync {
    /// Derives the stored form of a password. Must be deterministic.
    fn hash(&self, password: &str) -> PortResult<String>;
}

pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> PortResult<AccessToken>;

    /// Fails with `Unauthorized` for bad signatures, malformed or expired tokens.
    fn verify(&self, token: &str) -> PortResult<TokenClaims>;
}
