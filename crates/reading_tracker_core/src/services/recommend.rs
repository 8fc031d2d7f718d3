//! crates/reading_tracker_core/src/services/recommend.rs
//!
//! Ranks books by how many pages have been read in them.
//!
//! "Read pages" is the sum of interval lengths across every user. Intervals of
//! different users covering the same pages are counted once per user.

use std::sync::Arc;
use tracing::debug;

use crate::domain::TopBook;
use crate::ports::{BookRepository, PortResult, ReadingIntervalRepository};

pub const DEFAULT_TOP_BOOKS: usize = 5;

pub struct Recommender {
    books: Arc<dyn BookRepository>,
    intervals: Arc<dyn ReadingIntervalRepository>,
}

impl Recommender {
    pub fn new(
        books: Arc<dyn BookRepository>,
        intervals: Arc<dyn ReadingIntervalRepository>,
    ) -> Self {
        Self { books, intervals }
    }

    /// The `limit` most-read books, largest total first. An empty ledger
    /// yields an empty list.
    pub async fn top_books(&self, limit: usize) -> PortResult<Vec<TopBook>> {
        let totals = self.intervals.aggregate_by_book(limit).await?;

        let mut ranked = Vec::with_capacity(totals.len());
        for total in totals {
            match self.books.find_by_id(total.book_id).await? {
                Some(book) => ranked.push(TopBook {
                    book_id: book.id,
                    book_name: book.name,
                    total_pages: book.number_of_pages,
                    read_pages: total.read_pages,
                }),
                None => debug!(book_id = %total.book_id, "Skipping unresolved book in ranking"),
            }
        }
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookDraft, NewReadingInterval};
    use crate::memory::InMemoryStore;
    use uuid::Uuid;

    async fn add_book(store: &InMemoryStore, name: &str) -> Uuid {
        BookRepository::create(
            store,
            BookDraft {
                name: name.to_string(),
                number_of_pages: 500,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn read(store: &InMemoryStore, book_id: Uuid, start: u32, end: u32) {
        store
            .save(NewReadingInterval {
                user_id: Uuid::new_v4(),
                book_id,
                start_page: start,
                end_page: end,
            })
            .await
            .unwrap();
    }

    fn recommender(store: &InMemoryStore) -> Recommender {
        Recommender::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn ranks_by_summed_interval_length() {
        let store = InMemoryStore::new();
        let book_a = add_book(&store, "A").await;
        let book_b = add_book(&store, "B").await;
        read(&store, book_a, 1, 10).await;
        read(&store, book_a, 20, 30).await;
        read(&store, book_b, 1, 50).await;

        let top = recommender(&store).top_books(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].book_id, book_b);
        assert_eq!(top[0].book_name, "B");
        assert_eq!(top[0].read_pages, 50);
        assert_eq!(top[0].total_pages, 500);

        let both = recommender(&store).top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        let totals: Vec<u64> = both.iter().map(|entry| entry.read_pages).collect();
        assert_eq!(totals, vec![50, 21]);
    }

    #[tokio::test]
    async fn overlapping_reads_by_different_users_are_summed() {
        let store = InMemoryStore::new();
        let book = add_book(&store, "Shared").await;
        read(&store, book, 1, 10).await;
        read(&store, book, 1, 10).await;

        let top = recommender(&store).top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        assert_eq!(top[0].read_pages, 20);
    }

    #[tokio::test]
    async fn empty_ledger_is_not_an_error() {
        let store = InMemoryStore::new();
        add_book(&store, "Unread").await;
        let top = recommender(&store).top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        assert!(top.is_empty());
    }

    #[tokio::test]
    async fn repeated_reads_return_the_same_ranking() {
        let store = InMemoryStore::new();
        for (index, name) in ["One", "Two", "Three"].iter().enumerate() {
            let book = add_book(&store, name).await;
            read(&store, book, 1, 10 * (index as u32 + 1)).await;
        }
        let service = recommender(&store);
        let first = service.top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        let second = service.top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].book_name, "Three");
    }

    #[tokio::test]
    async fn deleted_books_drop_out_of_the_ranking() {
        let store = InMemoryStore::new();
        let gone = add_book(&store, "Gone").await;
        let kept = add_book(&store, "Kept").await;
        read(&store, gone, 1, 100).await;
        read(&store, kept, 1, 5).await;
        store.soft_delete(gone).await.unwrap();

        let top = recommender(&store).top_books(DEFAULT_TOP_BOOKS).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].book_id, kept);
    }
}
