use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::StoreResult;

/// Minimal view of a document collection.
///
/// Filters are equality documents: a document matches when every key in the
/// filter is present with an equal value.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Name of the underlying collection, used in logs.
    fn name(&self) -> &str;

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>>;

    async fn find_all(&self) -> StoreResult<Vec<Document>>;

    async fn insert_one(&self, document: Document) -> StoreResult<()>;

    /// Replace the first match. Returns whether a document was replaced.
    async fn replace_one(&self, filter: Document, document: Document) -> StoreResult<bool>;

    /// Delete the first match. Returns the number of deleted documents.
    async fn delete_one(&self, filter: Document) -> StoreResult<u64>;
}

/// Single-field equality filter.
pub fn eq(field: &str, value: impl Into<Bson>) -> Document {
    let mut filter = Document::new();
    filter.insert(field, value.into());
    filter
}
