//! crates/reading_tracker_core/src/services/books.rs
//!
//! Catalog management: create, list, update and soft-delete books.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Book, BookDraft, BookFilter, PageRequest, Paginated};
use crate::ports::{BookRepository, PortError, PortResult};

pub struct BookCatalog {
    books: Arc<dyn BookRepository>,
}

impl BookCatalog {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    pub async fn create_book(&self, draft: BookDraft) -> PortResult<Book> {
        let book = self.books.create(draft).await?;
        info!(book_id = %book.id, "Created book '{}'", book.name);
        Ok(book)
    }

    pub async fn list_books(
        &self,
        filter: &BookFilter,
        page: PageRequest,
    ) -> PortResult<Paginated<Book>> {
        self.books.list(filter, page).await
    }

    pub async fn update_book(&self, id: Uuid, draft: BookDraft) -> PortResult<Book> {
        let book = self
            .books
            .update(id, draft)
            .await?
            .ok_or_else(|| PortError::NotFound("Book not found".to_string()))?;
        info!(book_id = %book.id, "Updated book");
        Ok(book)
    }

    pub async fn delete_book(&self, id: Uuid) -> PortResult<()> {
        if !self.books.soft_delete(id).await? {
            return Err(PortError::NotFound("Book not found".to_string()));
        }
        info!(book_id = %id, "Soft-deleted book");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    fn draft(name: &str, pages: u32) -> BookDraft {
        BookDraft {
            name: name.to_string(),
            number_of_pages: pages,
        }
    }

    fn catalog() -> BookCatalog {
        BookCatalog::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn names_are_unique() {
        let catalog = catalog();
        catalog.create_book(draft("Gang of Four", 395)).await.unwrap();
        let err = catalog.create_book(draft("Gang of Four", 10)).await.unwrap_err();
        assert!(matches!(err, PortError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn update_changes_fields_and_reports_missing_ids() {
        let catalog = catalog();
        let book = catalog.create_book(draft("Draft", 10)).await.unwrap();
        let updated = catalog.update_book(book.id, draft("Final", 20)).await.unwrap();
        assert_eq!(updated.name, "Final");
        assert_eq!(updated.number_of_pages, 20);

        let err = catalog
            .update_book(Uuid::new_v4(), draft("Nope", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleted_books_leave_the_listing() {
        let catalog = catalog();
        let book = catalog.create_book(draft("Temporary", 10)).await.unwrap();
        catalog.create_book(draft("Permanent", 10)).await.unwrap();
        catalog.delete_book(book.id).await.unwrap();

        let page = catalog
            .list_books(&BookFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].name, "Permanent");

        let err = catalog.delete_book(book.id).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}
