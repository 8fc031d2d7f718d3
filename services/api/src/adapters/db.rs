//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the repository ports from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reading_tracker_core::domain::{
    Book, BookDraft, BookFilter, BookReadTotal, NewReadingInterval, NewUser, PageRequest,
    Paginated, ReadingInterval, Role, User, UserCredentials,
};
use reading_tracker_core::ports::{
    BookRepository, PortError, PortResult, ReadingIntervalRepository, UserRepository,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the repository ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a unique-constraint violation to `AlreadyExists`, anything else to `Unexpected`.
fn conflict_or_unexpected(e: sqlx::Error, message: impl FnOnce() -> String) -> PortError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return PortError::AlreadyExists(message());
        }
    }
    unexpected(e)
}

/// Page counts and page numbers are stored as `INTEGER`.
fn page_column(value: u32) -> PortResult<i32> {
    i32::try_from(value)
        .map_err(|_| PortError::InvalidRange(format!("Page value {} is out of range", value)))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<UserCredentials> {
        let role = self.role.parse::<Role>().map_err(PortError::Unexpected)?;
        Ok(UserCredentials {
            user: User {
                id: self.id,
                email: self.email,
                role,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            hashed_password: self.password,
        })
    }
}

#[derive(FromRow)]
struct BookRecord {
    id: Uuid,
    name: String,
    number_of_pages: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl BookRecord {
    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            name: self.name,
            number_of_pages: self.number_of_pages as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ReadingIntervalRecord {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    start_page: i32,
    end_page: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ReadingIntervalRecord {
    fn to_domain(self) -> ReadingInterval {
        ReadingInterval {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            start_page: self.start_page as u32,
            end_page: self.end_page as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct BookTotalRecord {
    book_id: Uuid,
    read_pages: i64,
}

const USER_COLUMNS: &str = "id, email, password, role, created_at, updated_at";
const BOOK_COLUMNS: &str = "id, name, number_of_pages, created_at, updated_at";
const INTERVAL_COLUMNS: &str = "id, user_id, book_id, start_page, end_page, created_at, updated_at";

//=========================================================================================
// `UserRepository` Implementation
//=========================================================================================

#[async_trait]
impl UserRepository for DbAdapter {
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record
            .map(|r| r.to_domain().map(|credentials| credentials.user))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(UserRecord::to_domain).transpose()
    }

    async fn create(&self, user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_unexpected(e, || "User already exist".to_string()))?;
        Ok(record.to_domain()?.user)
    }
}

//=========================================================================================
// `BookRepository` Implementation
//=========================================================================================

#[async_trait]
impl BookRepository for DbAdapter {
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Book>> {
        let record = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(BookRecord::to_domain))
    }

    async fn create(&self, draft: BookDraft) -> PortResult<Book> {
        let record = sqlx::query_as::<_, BookRecord>(&format!(
            "INSERT INTO books (id, name, number_of_pages) VALUES ($1, $2, $3) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(page_column(draft.number_of_pages)?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            conflict_or_unexpected(e, || format!("A book named '{}' already exists", draft.name))
        })?;
        Ok(record.to_domain())
    }

    async fn update(&self, id: Uuid, draft: BookDraft) -> PortResult<Option<Book>> {
        let record = sqlx::query_as::<_, BookRecord>(&format!(
            "UPDATE books SET name = $2, number_of_pages = $3, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(page_column(draft.number_of_pages)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            conflict_or_unexpected(e, || format!("A book named '{}' already exists", draft.name))
        })?;
        Ok(record.map(BookRecord::to_domain))
    }

    async fn list(&self, filter: &BookFilter, page: PageRequest) -> PortResult<Paginated<Book>> {
        const WHERE: &str = "deleted_at IS NULL \
             AND ($1::TEXT IS NULL OR name = $1) \
             AND ($2::INTEGER IS NULL OR number_of_pages = $2)";
        let number_of_pages = filter.number_of_pages.map(page_column).transpose()?;

        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM books WHERE {WHERE}"))
            .bind(filter.search.as_deref())
            .bind(number_of_pages)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        let records = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE {WHERE} \
             ORDER BY created_at ASC, id ASC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.search.as_deref())
        .bind(number_of_pages)
        .bind(i64::from(page.per_page))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let books = records.into_iter().map(BookRecord::to_domain).collect();
        Ok(Paginated::new(books, page, count as u64))
    }

    async fn soft_delete(&self, id: Uuid) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }
}

//=========================================================================================
// `ReadingIntervalRepository` Implementation
//=========================================================================================

#[async_trait]
impl ReadingIntervalRepository for DbAdapter {
    async fn find_overlapping(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        start_page: u32,
        end_page: u32,
    ) -> PortResult<Vec<ReadingInterval>> {
        let (start_page, end_page) = (page_column(start_page)?, page_column(end_page)?);
        let records = sqlx::query_as::<_, ReadingIntervalRecord>(&format!(
            "SELECT {INTERVAL_COLUMNS} FROM reading_books \
             WHERE user_id = $1 AND book_id = $2 AND deleted_at IS NULL \
             AND start_page <= $4 AND end_page >= $3 \
             ORDER BY start_page ASC"
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(start_page)
        .bind(end_page)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records
            .into_iter()
            .map(ReadingIntervalRecord::to_domain)
            .collect())
    }

    async fn save(&self, interval: NewReadingInterval) -> PortResult<ReadingInterval> {
        let record = sqlx::query_as::<_, ReadingIntervalRecord>(&format!(
            "INSERT INTO reading_books (id, user_id, book_id, start_page, end_page) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {INTERVAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(interval.user_id)
        .bind(interval.book_id)
        .bind(page_column(interval.start_page)?)
        .bind(page_column(interval.end_page)?)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn aggregate_by_book(&self, limit: usize) -> PortResult<Vec<BookReadTotal>> {
        let records = sqlx::query_as::<_, BookTotalRecord>(
            "SELECT rb.book_id, SUM(rb.end_page - rb.start_page + 1)::BIGINT AS read_pages \
             FROM reading_books rb \
             JOIN books b ON b.id = rb.book_id \
             WHERE rb.deleted_at IS NULL AND b.deleted_at IS NULL \
             GROUP BY rb.book_id \
             ORDER BY read_pages DESC, rb.book_id ASC \
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records
            .into_iter()
            .map(|r| BookReadTotal {
                book_id: r.book_id,
                read_pages: r.read_pages as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_values_past_the_integer_column_are_rejected() {
        assert_eq!(page_column(412).unwrap(), 412);
        assert_eq!(page_column(i32::MAX as u32).unwrap(), i32::MAX);
        assert!(matches!(
            page_column(3_000_000_000),
            Err(PortError::InvalidRange(_))
        ));
    }
}
