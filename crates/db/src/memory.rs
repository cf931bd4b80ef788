use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tokio::sync::Mutex;

use crate::collection::DocumentCollection;
use crate::error::StoreResult;

/// In-process collection keeping documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    documents: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Seed the collection with raw documents, bypassing any mapping.
    pub fn with_documents(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(documents),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

fn integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(n) => Some(*n),
        _ => integer(value).map(|n| n as f64),
    }
}

/// Equality as the server applies it: numbers compare by value across
/// Int32, Int64 and Double.
fn same_value(stored: &Bson, wanted: &Bson) -> bool {
    if let (Some(a), Some(b)) = (integer(stored), integer(wanted)) {
        return a == b;
    }
    match (number(stored), number(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => stored == wanted,
    }
}

fn matches(filter: &Document, document: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key).is_some_and(|stored| same_value(stored, value)))
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        let documents = self.documents.lock().await;
        Ok(documents.iter().find(|doc| matches(&filter, doc)).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        Ok(self.documents.lock().await.clone())
    }

    async fn insert_one(&self, document: Document) -> StoreResult<()> {
        self.documents.lock().await.push(document);
        Ok(())
    }

    async fn replace_one(&self, filter: Document, document: Document) -> StoreResult<bool> {
        let mut documents = self.documents.lock().await;
        match documents.iter_mut().find(|doc| matches(&filter, doc)) {
            Some(slot) => {
                *slot = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let mut documents = self.documents.lock().await;
        match documents.iter().position(|doc| matches(&filter, doc)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
