//! crates/reading_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The access level attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// The data needed to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    pub number_of_pages: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable fields of a book, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub number_of_pages: u32,
}

/// Optional exact-match filters for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub search: Option<String>,
    pub number_of_pages: Option<u32>,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PER_PAGE: u32 = 25;

    /// Number of rows to skip. Page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub count: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, count: u64) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            count,
            total_pages: count.div_ceil(per_page),
        }
    }
}

/// A recorded reading session: the closed page range `[start_page, end_page]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingInterval {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub start_page: u32,
    pub end_page: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReadingInterval {
    /// Number of pages covered, both ends inclusive.
    pub fn page_count(&self) -> u64 {
        u64::from(self.end_page.saturating_sub(self.start_page)) + 1
    }

    pub fn overlaps(&self, start_page: u32, end_page: u32) -> bool {
        ranges_overlap(self.start_page, self.end_page, start_page, end_page)
    }
}

/// An interval that has passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReadingInterval {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub start_page: u32,
    pub end_page: u32,
}

/// Summed interval length for one book, as produced by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookReadTotal {
    pub book_id: Uuid,
    pub read_pages: u64,
}

/// A ranked entry of the "top recommended books" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBook {
    pub book_id: Uuid,
    pub book_name: String,
    pub total_pages: u32,
    pub read_pages: u64,
}

/// A signed bearer credential handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// The identity asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Uuid,
    pub role: Role,
}

/// The result of a successful register or login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: AccessToken,
}

/// Closed-interval overlap test: the ranges share at least one page.
pub fn ranges_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start <= b_end && a_end >= b_start
}
