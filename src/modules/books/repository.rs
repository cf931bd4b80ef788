use std::sync::Arc;

use async_trait::async_trait;
use libris_db::fields::{required_i32, required_str};
use libris_db::{doc, eq, DocumentCollection, Document, StoreResult};

use super::models::Book;

const ENTITY: &str = "Book";
const ID_FIELD: &str = "id";
const SERIAL_NUMBER_FIELD: &str = "serialNumber";
const NAME_FIELD: &str = "name";
const AUTHOR_NAME_FIELD: &str = "authorName";
const GENRE_FIELD: &str = "genre";

/// Persistence contract for books.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert or fully replace the book with the same id.
    async fn save(&self, book: &Book) -> StoreResult<()>;

    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>>;

    async fn find_by_serial_number(&self, serial_number: &str) -> StoreResult<Option<Book>>;

    async fn delete(&self, serial_number: &str) -> StoreResult<()>;
}

/// Maps books onto flat `{id, serialNumber, name, authorName, genre}` documents.
pub struct BookDocumentRepository {
    collection: Arc<dyn DocumentCollection>,
}

impl BookDocumentRepository {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    fn to_document(book: &Book) -> Document {
        doc! {
            ID_FIELD: book.id,
            SERIAL_NUMBER_FIELD: book.serial_number.as_str(),
            NAME_FIELD: book.name.as_str(),
            AUTHOR_NAME_FIELD: book.author_name.as_str(),
            GENRE_FIELD: book.genre.as_str(),
        }
    }

    fn from_document(document: &Document) -> StoreResult<Book> {
        Ok(Book::new(
            required_i32(document, ENTITY, ID_FIELD)?,
            required_str(document, ENTITY, SERIAL_NUMBER_FIELD)?,
            required_str(document, ENTITY, NAME_FIELD)?,
            required_str(document, ENTITY, AUTHOR_NAME_FIELD)?,
            required_str(document, ENTITY, GENRE_FIELD)?,
        ))
    }
}

#[async_trait]
impl BookRepository for BookDocumentRepository {
    async fn save(&self, book: &Book) -> StoreResult<()> {
        let document = Self::to_document(book);
        let replaced = self
            .collection
            .replace_one(eq(ID_FIELD, book.id), document.clone())
            .await?;
        if !replaced {
            self.collection.insert_one(document).await?;
        }

        tracing::debug!(
            collection = self.collection.name(),
            id = book.id,
            replaced,
            "book saved"
        );
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        self.collection
            .find_all()
            .await?
            .iter()
            .map(Self::from_document)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        self.collection
            .find_one(eq(ID_FIELD, id))
            .await?
            .as_ref()
            .map(Self::from_document)
            .transpose()
    }

    async fn find_by_serial_number(&self, serial_number: &str) -> StoreResult<Option<Book>> {
        self.collection
            .find_one(eq(SERIAL_NUMBER_FIELD, serial_number))
            .await?
            .as_ref()
            .map(Self::from_document)
            .transpose()
    }

    async fn delete(&self, serial_number: &str) -> StoreResult<()> {
        let deleted = self
            .collection
            .delete_one(eq(SERIAL_NUMBER_FIELD, serial_number))
            .await?;
        tracing::debug!(
            collection = self.collection.name(),
            serial_number,
            deleted,
            "book delete issued"
        );
        Ok(())
    }
}
