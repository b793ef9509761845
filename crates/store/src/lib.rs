//! Store abstraction for the lectern book catalog.
//!
//! Handlers talk to [`BookStore`] only; the in-memory backend in [`memory`]
//! is the default, and a relational backend can implement the same trait
//! without touching handler, validation, or pagination logic.

use async_trait::async_trait;
use time::OffsetDateTime;

pub mod memory;

pub use memory::MemoryStore;

/// Fields a client supplies when creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// A persisted book row. Identity and timestamps are store-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// Storage contract for the book catalog.
///
/// Ids are unique across the store's lifetime and monotonically increasing;
/// an id is never reused after deletion.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book, assigning its id and timestamps.
    async fn insert(&self, book: NewBook) -> anyhow::Result<BookRecord>;

    /// Fetch a single book by id.
    async fn get(&self, id: i64) -> anyhow::Result<Option<BookRecord>>;

    /// Remove a book by id. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    /// List books ordered by id descending, optionally restricted to
    /// `id < before`, returning at most `limit` rows.
    async fn list_desc(&self, before: Option<i64>, limit: i64) -> anyhow::Result<Vec<BookRecord>>;

    /// Number of books currently stored.
    async fn count(&self) -> anyhow::Result<u64>;
}
