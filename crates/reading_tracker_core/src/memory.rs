//! crates/reading_tracker_core/src/memory.rs
//!
//! An in-process implementation of the repository ports. Used for local runs
//! without PostgreSQL and as the backing store of the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Book, BookDraft, BookFilter, BookReadTotal, NewReadingInterval, NewUser, PageRequest,
    Paginated, ReadingInterval, User, UserCredentials,
};
use crate::ports::{
    BookRepository, PortError, PortResult, ReadingIntervalRepository, UserRepository,
};

struct Row<T> {
    value: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Row<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<Row<UserCredentials>>,
    books: Vec<Row<Book>>,
    intervals: Vec<Row<ReadingInterval>>,
}

/// All three ledgers behind one lock, cloned cheaply via `Arc`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an interval as deleted.
    pub async fn soft_delete_interval(&self, id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        match tables
            .intervals
            .iter_mut()
            .find(|row| row.is_live() && row.value.id == id)
        {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.is_live() && row.value.user.id == id)
            .map(|row| row.value.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.is_live() && row.value.user.email == email)
            .map(|row| row.value.clone()))
    }

    async fn create(&self, user: NewUser) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        // The unique constraint covers soft-deleted rows too.
        if tables.users.iter().any(|row| row.value.user.email == user.email) {
            return Err(PortError::AlreadyExists("User already exist".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(Row::live(UserCredentials {
            user: created.clone(),
            hashed_password: user.hashed_password,
        }));
        Ok(created)
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .find(|row| row.is_live() && row.value.id == id)
            .map(|row| row.value.clone()))
    }

    async fn create(&self, draft: BookDraft) -> PortResult<Book> {
        let mut tables = self.tables.write().await;
        if tables.books.iter().any(|row| row.value.name == draft.name) {
            return Err(PortError::AlreadyExists(format!(
                "A book named '{}' already exists",
                draft.name
            )));
        }
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            name: draft.name,
            number_of_pages: draft.number_of_pages,
            created_at: now,
            updated_at: now,
        };
        tables.books.push(Row::live(book.clone()));
        Ok(book)
    }

    async fn update(&self, id: Uuid, draft: BookDraft) -> PortResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .books
            .iter()
            .position(|row| row.is_live() && row.value.id == id)
        else {
            return Ok(None);
        };
        if tables
            .books
            .iter()
            .any(|row| row.value.id != id && row.value.name == draft.name)
        {
            return Err(PortError::AlreadyExists(format!(
                "A book named '{}' already exists",
                draft.name
            )));
        }
        let row = &mut tables.books[index];
        row.value.name = draft.name;
        row.value.number_of_pages = draft.number_of_pages;
        row.value.updated_at = Utc::now();
        Ok(Some(row.value.clone()))
    }

    async fn list(&self, filter: &BookFilter, page: PageRequest) -> PortResult<Paginated<Book>> {
        let tables = self.tables.read().await;
        let matching: Vec<&Book> = tables
            .books
            .iter()
            .filter(|row| row.is_live())
            .map(|row| &row.value)
            .filter(|book| filter.search.as_ref().map_or(true, |name| &book.name == name))
            .filter(|book| {
                filter
                    .number_of_pages
                    .map_or(true, |pages| book.number_of_pages == pages)
            })
            .collect();

        let count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect();
        Ok(Paginated::new(items, page, count))
    }

    async fn soft_delete(&self, id: Uuid) -> PortResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .books
            .iter_mut()
            .find(|row| row.is_live() && row.value.id == id)
        {
            Some(row) => {
                let now = Utc::now();
                row.deleted_at = Some(now);
                row.value.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReadingIntervalRepository for InMemoryStore {
    async fn find_overlapping(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        start_page: u32,
        end_page: u32,
    ) -> PortResult<Vec<ReadingInterval>> {
        let tables = self.tables.read().await;
        Ok(tables
            .intervals
            .iter()
            .filter(|row| row.is_live())
            .map(|row| &row.value)
            .filter(|interval| interval.user_id == user_id && interval.book_id == book_id)
            .filter(|interval| interval.overlaps(start_page, end_page))
            .cloned()
            .collect())
    }

    async fn save(&self, interval: NewReadingInterval) -> PortResult<ReadingInterval> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let saved = ReadingInterval {
            id: Uuid::new_v4(),
            user_id: interval.user_id,
            book_id: interval.book_id,
            start_page: interval.start_page,
            end_page: interval.end_page,
            created_at: now,
            updated_at: now,
        };
        tables.intervals.push(Row::live(saved.clone()));
        Ok(saved)
    }

    async fn aggregate_by_book(&self, limit: usize) -> PortResult<Vec<BookReadTotal>> {
        let tables = self.tables.read().await;
        let mut totals: HashMap<Uuid, u64> = HashMap::new();
        for interval in tables.intervals.iter().filter(|row| row.is_live()) {
            let book_is_live = tables
                .books
                .iter()
                .any(|row| row.is_live() && row.value.id == interval.value.book_id);
            if book_is_live {
                *totals.entry(interval.value.book_id).or_default() += interval.value.page_count();
            }
        }

        let mut ranked: Vec<BookReadTotal> = totals
            .into_iter()
            .map(|(book_id, read_pages)| BookReadTotal {
                book_id,
                read_pages,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.read_pages
                .cmp(&a.read_pages)
                .then_with(|| a.book_id.cmp(&b.book_id))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}
