//! In-memory [`BookStore`] backend.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{BookRecord, BookStore, NewBook};

/// In-memory book store.
///
/// Rows live in insertion order (ids ascend with position), so descending
/// listings walk the vector in reverse. The id counter only ever increments,
/// including across deletions.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    books: Vec<BookRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn insert(&self, book: NewBook) -> anyhow::Result<BookRecord> {
        let mut inner = self.inner.write().await;
        let now = OffsetDateTime::now_utc();
        let record = BookRecord {
            id: inner.next_id,
            title: book.title,
            author: book.author,
            year: book.year,
            created_at: Some(now),
            updated_at: Some(now),
        };
        inner.next_id += 1;
        inner.books.push(record.clone());
        tracing::debug!(id = record.id, "book inserted");
        Ok(record)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<BookRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.books.iter().find(|book| book.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.books.len();
        inner.books.retain(|book| book.id != id);
        let removed = inner.books.len() < before;
        if removed {
            tracing::debug!(id, "book deleted");
        }
        Ok(removed)
    }

    async fn list_desc(&self, before: Option<i64>, limit: i64) -> anyhow::Result<Vec<BookRecord>> {
        let inner = self.inner.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(inner
            .books
            .iter()
            .rev()
            .filter(|book| before.map_or(true, |bound| book.id < bound))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.books.len() as u64)
    }
}

/// The catalog the service ships with in development.
pub fn sample_catalog() -> Vec<NewBook> {
    [
        ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
        ("To Kill a Mockingbird", "Harper Lee", 1960),
        ("1984", "George Orwell", 1949),
        ("Pride and Prejudice", "Jane Austen", 1813),
        ("The Hobbit", "J.R.R. Tolkien", 1937),
    ]
    .into_iter()
    .map(|(title, author, year)| NewBook {
        title: title.to_string(),
        author: author.to_string(),
        year,
    })
    .collect()
}
