//! services/api/src/web/dto.rs
//!
//! Request and response payloads of the REST API. Field names follow the
//! camelCase wire format; conversions from the core domain types live here.

use chrono::{DateTime, Utc};
use reading_tracker_core::domain::{AuthOutcome, Book, ReadingInterval, TopBook, User};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Auth
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
pub struct RegisterRequest {
    #[schema(example = "octane@gmail.com")]
    pub email: String,
    #[schema(example = "Octane@123")]
    pub password: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct LoginRequest {
    #[schema(example = "octane@gmail.com")]
    pub email: String,
    #[schema(example = "Octane@123")]
    pub password: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    #[schema(example = "USER")]
    pub role: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: TokenDto,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            user: outcome.user.into(),
            token: TokenDto {
                access_token: outcome.token.access_token,
                expires_in: outcome.token.expires_in,
            },
        }
    }
}

//=========================================================================================
// Books
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[schema(example = "Gang of Four")]
    pub name: String,
    #[schema(example = 100)]
    pub number_of_pages: i64,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub name: String,
    pub number_of_pages: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            number_of_pages: book.number_of_pages,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

#[derive(Deserialize, IntoParams, Debug, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Page number, starting at 1.
    pub page: Option<i64>,
    /// Items per page, 25 when omitted.
    pub per_page: Option<i64>,
    /// Exact book name.
    pub search: Option<String>,
    /// Exact page count.
    pub number_of_pages: Option<i64>,
}

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct TopBooksQuery {
    /// Number of books to return, 5 when omitted.
    pub limit: Option<i64>,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TopBookDto {
    pub book_id: Uuid,
    pub book_name: String,
    pub total_pages: u32,
    pub read_pages: u64,
}

impl From<TopBook> for TopBookDto {
    fn from(top: TopBook) -> Self {
        Self {
            book_id: top.book_id,
            book_name: top.book_name,
            total_pages: top.total_pages,
            read_pages: top.read_pages,
        }
    }
}

//=========================================================================================
// Reading intervals
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveIntervalRequest {
    #[schema(example = "1f194333-f9c9-43c2-b406-d8c03803867c")]
    pub book_id: String,
    #[schema(example = 1)]
    pub start_page: i64,
    #[schema(example = 100)]
    pub end_page: i64,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReadingIntervalDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub start_page: u32,
    pub end_page: u32,
    pub created_at: DateTime<Utc>,
}

impl From<ReadingInterval> for ReadingIntervalDto {
    fn from(interval: ReadingInterval) -> Self {
        Self {
            id: interval.id,
            user_id: interval.user_id,
            book_id: interval.book_id,
            start_page: interval.start_page,
            end_page: interval.end_page,
            created_at: interval.created_at,
        }
    }
}
