//! crates/reading_tracker_core/src/services/readings.rs
//!
//! Records reading intervals. A new interval must fit inside its book and must
//! not share a page with any live interval the same user already recorded for
//! that book.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{NewReadingInterval, ReadingInterval, User};
use crate::ports::{BookRepository, PortError, PortResult, ReadingIntervalRepository};

pub struct IntervalRecorder {
    books: Arc<dyn BookRepository>,
    intervals: Arc<dyn ReadingIntervalRepository>,
}

impl IntervalRecorder {
    pub fn new(
        books: Arc<dyn BookRepository>,
        intervals: Arc<dyn ReadingIntervalRepository>,
    ) -> Self {
        Self { books, intervals }
    }

    /// Validates and stores `[start_page, end_page]` for `user` in `book_id`.
    ///
    /// Errors: `InvalidRange` for an empty/zero-based range or one past the last
    /// page, `NotFound` for an unknown book, `OverlapConflict` when the range
    /// collides with an existing interval. Nothing is written on error.
    pub async fn record_interval(
        &self,
        user: &User,
        book_id: Uuid,
        start_page: u32,
        end_page: u32,
    ) -> PortResult<ReadingInterval> {
        if start_page == 0 || end_page < start_page {
            return Err(PortError::InvalidRange(
                "StartPage must be positive and not greater than EndPage".to_string(),
            ));
        }

        let book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("There's no book with this id: {}", book_id)))?;

        if end_page > book.number_of_pages {
            return Err(PortError::InvalidRange(
                "EndPage can't be more than the book pages".to_string(),
            ));
        }

        let overlapping = self
            .intervals
            .find_overlapping(user.id, book.id, start_page, end_page)
            .await?;
        if let Some(existing) = overlapping.first() {
            debug!(
                user_id = %user.id,
                book_id = %book.id,
                existing_start = existing.start_page,
                existing_end = existing.end_page,
                "Rejected overlapping reading interval"
            );
            return Err(PortError::OverlapConflict(format!(
                "Interval {}-{} overlaps an already recorded interval {}-{}",
                start_page, end_page, existing.start_page, existing.end_page
            )));
        }

        let saved = self
            .intervals
            .save(NewReadingInterval {
                user_id: user.id,
                book_id: book.id,
                start_page,
                end_page,
            })
            .await?;
        info!(
            interval_id = %saved.id,
            user_id = %user.id,
            book_id = %book.id,
            "Recorded reading interval {}-{}",
            start_page,
            end_page
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookDraft, Role};
    use crate::memory::InMemoryStore;
    use chrono::Utc;

    fn reader() -> User {
        User {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn setup(pages: u32) -> (InMemoryStore, IntervalRecorder, Uuid) {
        let store = InMemoryStore::new();
        let book = BookRepository::create(
            &store,
            BookDraft {
                name: "Refactoring".to_string(),
                number_of_pages: pages,
            },
        )
        .await
        .unwrap();
        let recorder = IntervalRecorder::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (store, recorder, book.id)
    }

    #[tokio::test]
    async fn overlapping_ranges_are_rejected() {
        let (_store, recorder, book_id) = setup(100).await;
        let user = reader();
        recorder.record_interval(&user, book_id, 1, 10).await.unwrap();

        for (start, end) in [(5, 15), (1, 1), (10, 20)] {
            let err = recorder
                .record_interval(&user, book_id, start, end)
                .await
                .unwrap_err();
            assert!(
                matches!(err, PortError::OverlapConflict(_)),
                "[{}, {}] should conflict, got {:?}",
                start,
                end,
                err
            );
        }

        let next = recorder.record_interval(&user, book_id, 11, 20).await.unwrap();
        assert_eq!((next.start_page, next.end_page), (11, 20));
    }

    #[tokio::test]
    async fn other_users_may_read_the_same_pages() {
        let (_store, recorder, book_id) = setup(100).await;
        recorder.record_interval(&reader(), book_id, 1, 10).await.unwrap();
        recorder.record_interval(&reader(), book_id, 1, 10).await.unwrap();
    }

    #[tokio::test]
    async fn end_page_is_bounded_by_the_book() {
        let (_store, recorder, book_id) = setup(5).await;
        let user = reader();
        let err = recorder.record_interval(&user, book_id, 1, 10).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidRange(_)));
        recorder.record_interval(&user, book_id, 1, 5).await.unwrap();
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let (_store, recorder, book_id) = setup(50).await;
        let err = recorder.record_interval(&reader(), book_id, 9, 3).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidRange(_)));
        let err = recorder.record_interval(&reader(), book_id, 0, 3).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn unknown_book_writes_nothing() {
        let (store, recorder, _book_id) = setup(50).await;
        let user = reader();
        let missing = Uuid::new_v4();
        let err = recorder.record_interval(&user, missing, 1, 2).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        let written = store.find_overlapping(user.id, missing, 1, u32::MAX).await.unwrap();
        assert!(written.is_empty());
        assert!(store.aggregate_by_book(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_intervals_no_longer_block() {
        let (store, recorder, book_id) = setup(50).await;
        let user = reader();
        let first = recorder.record_interval(&user, book_id, 1, 10).await.unwrap();
        assert!(store.soft_delete_interval(first.id).await);
        recorder.record_interval(&user, book_id, 5, 15).await.unwrap();
    }
}
