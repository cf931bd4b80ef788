use std::sync::Arc;

use async_trait::async_trait;
use libris_db::fields::{optional_i32, required_i32, required_str};
use libris_db::{doc, eq, Bson, DocumentCollection, Document, StoreResult};

use super::models::Member;
use crate::modules::books::repository::BookRepository;

const ENTITY: &str = "Member";
const ID_FIELD: &str = "id";
const NAME_FIELD: &str = "name";
const EMAIL_FIELD: &str = "email";
const BOOK_ID_FIELD: &str = "bookId";

/// Persistence contract for members.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert or fully replace the member with the same id.
    async fn save(&self, member: &Member) -> StoreResult<()>;

    async fn find_all(&self) -> StoreResult<Vec<Member>>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Member>>;

    async fn delete(&self, id: i32) -> StoreResult<()>;
}

/// Maps members onto `{id, name, email, bookId}` documents.
///
/// The borrowed book is stored by id only and looked up through the book
/// repository on every read.
pub struct MemberDocumentRepository {
    collection: Arc<dyn DocumentCollection>,
    books: Arc<dyn BookRepository>,
}

impl MemberDocumentRepository {
    pub fn new(collection: Arc<dyn DocumentCollection>, books: Arc<dyn BookRepository>) -> Self {
        Self { collection, books }
    }

    fn to_document(member: &Member) -> Document {
        let book_id = member
            .book
            .as_ref()
            .map_or(Bson::Null, |book| Bson::Int32(book.id));
        doc! {
            ID_FIELD: member.id,
            NAME_FIELD: member.name.as_str(),
            EMAIL_FIELD: member.email.as_str(),
            BOOK_ID_FIELD: book_id,
        }
    }

    async fn from_document(&self, document: &Document) -> StoreResult<Member> {
        let id = required_i32(document, ENTITY, ID_FIELD)?;
        let name = required_str(document, ENTITY, NAME_FIELD)?;
        let email = required_str(document, ENTITY, EMAIL_FIELD)?;

        let book = match optional_i32(document, ENTITY, BOOK_ID_FIELD)? {
            Some(book_id) => {
                let book = self.books.find_by_id(book_id).await?;
                if book.is_none() {
                    tracing::warn!(member = id, book = book_id, "member references a missing book");
                }
                book.map(|book| book.detached())
            }
            None => None,
        };

        Ok(Member::new(id, name, email, book))
    }
}

#[async_trait]
impl MemberRepository for MemberDocumentRepository {
    async fn save(&self, member: &Member) -> StoreResult<()> {
        let document = Self::to_document(member);
        let replaced = self
            .collection
            .replace_one(eq(ID_FIELD, member.id), document.clone())
            .await?;
        if !replaced {
            self.collection.insert_one(document).await?;
        }

        tracing::debug!(
            collection = self.collection.name(),
            id = member.id,
            replaced,
            "member saved"
        );
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Member>> {
        let documents = self.collection.find_all().await?;
        let mut members = Vec::with_capacity(documents.len());
        for document in &documents {
            members.push(self.from_document(document).await?);
        }
        Ok(members)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Member>> {
        match self.collection.find_one(eq(ID_FIELD, id)).await? {
            Some(document) => self.from_document(&document).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let deleted = self.collection.delete_one(eq(ID_FIELD, id)).await?;
        tracing::debug!(
            collection = self.collection.name(),
            id,
            deleted,
            "member delete issued"
        );
        Ok(())
    }
}
