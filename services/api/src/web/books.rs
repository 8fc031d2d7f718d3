//! services/api/src/web/books.rs
//!
//! Book catalog endpoints, both the reader-facing listing and the admin
//! dashboard.

use axum::{extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::dto::{BookDto, BookRequest, ListBooksQuery, TopBookDto, TopBooksQuery};
use crate::web::envelope::{Envelope, PaginationDto, Reply};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::state::AppState;
use crate::web::validation::{validate_book, validate_list_query, validate_top_query};

async fn list_books(state: &AppState, query: ListBooksQuery) -> Result<Reply<Vec<BookDto>>, ApiError> {
    let (filter, page) = validate_list_query(query)?;
    let result = state.books.list_books(&filter, page).await?;
    let pagination = PaginationDto::from(&result);
    let books = result.items.into_iter().map(BookDto::from).collect();
    Ok(Reply(
        StatusCode::OK,
        Envelope::success(StatusCode::OK, "Books retrieved successfully", books)
            .with_pagination(pagination),
    ))
}

async fn top_books(state: &AppState, query: TopBooksQuery) -> Result<Reply<Vec<TopBookDto>>, ApiError> {
    let limit = validate_top_query(query)?;
    let top = state.recommender.top_books(limit).await?;
    Ok(Reply::ok(
        "Top recommended books retrieved successfully",
        top.into_iter().map(TopBookDto::from).collect(),
    ))
}

//=========================================================================================
// Reader-facing Handlers
//=========================================================================================

/// Get all books with pagination.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    tag = "Api Books",
    params(ListBooksQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of books retrieved successfully", body = [BookDto]),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn list_books_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListBooksQuery>,
) -> Result<Reply<Vec<BookDto>>, ApiError> {
    list_books(&state, query).await
}

/// The most-read books.
#[utoipa::path(
    get,
    path = "/api/v1/books/top-recommend",
    tag = "Api Books",
    params(TopBooksQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books ranked by pages read", body = [TopBookDto]),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn top_books_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TopBooksQuery>,
) -> Result<Reply<Vec<TopBookDto>>, ApiError> {
    top_books(&state, query).await
}

//=========================================================================================
// Dashboard Handlers (ADMIN)
//=========================================================================================

/// Get all books with pagination.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/books",
    tag = "Dashboard Books",
    params(ListBooksQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of books retrieved successfully", body = [BookDto]),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn dashboard_list_books_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListBooksQuery>,
) -> Result<Reply<Vec<BookDto>>, ApiError> {
    list_books(&state, query).await
}

/// Create book.
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/books",
    tag = "Dashboard Books",
    request_body = BookRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "The book has been successfully created", body = BookDto),
        (status = 400, description = "Bad request, validation error or duplicate name"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn create_book_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Reply<BookDto>, ApiError> {
    let draft = validate_book(req)?;
    let book = state.books.create_book(draft).await?;
    Ok(Reply::created("Book created successfully", book.into()))
}

/// Update a book by ID.
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/books/{id}",
    tag = "Dashboard Books",
    params(("id" = Uuid, Path, description = "Book id")),
    request_body = BookRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The book has been successfully updated", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Reply<BookDto>, ApiError> {
    let draft = validate_book(req)?;
    let book = state.books.update_book(id, draft).await?;
    Ok(Reply::ok("Book updated successfully", book.into()))
}

/// Soft-delete a book by ID.
#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/books/{id}",
    tag = "Dashboard Books",
    params(("id" = Uuid, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The book has been deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Reply<()>, ApiError> {
    state.books.delete_book(id).await?;
    Ok(Reply::ok("Book deleted successfully", ()))
}

/// The most-read books.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/books/top-recommend",
    tag = "Dashboard Books",
    params(TopBooksQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books ranked by pages read", body = [TopBookDto]),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn dashboard_top_books_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TopBooksQuery>,
) -> Result<Reply<Vec<TopBookDto>>, ApiError> {
    top_books(&state, query).await
}
