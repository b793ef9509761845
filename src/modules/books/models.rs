use lectern_store::BookRecord;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Wire representation of a book.
///
/// `id`, `created_at`, and `updated_at` are dump-only: they appear in
/// responses but are never accepted on input (see `schema::validate_book`).
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Creation timestamp, ISO-8601, null when absent
    pub created_at: Option<String>,
    /// Last-update timestamp, ISO-8601, null when absent
    pub updated_at: Option<String>,
}

impl Book {
    /// Adapt a store-layer record into the canonical wire form.
    pub fn from_record(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            year: record.year,
            created_at: format_timestamp(record.created_at),
            updated_at: format_timestamp(record.updated_at),
        }
    }
}

fn format_timestamp(value: Option<OffsetDateTime>) -> Option<String> {
    value.and_then(|ts| ts.format(&Rfc3339).ok())
}
