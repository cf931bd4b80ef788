use std::sync::Arc;

use libris_db::{DocumentCollection, DocumentStore, MemoryCollection, StoreResult};
use libris_kernel::settings::StoreSettings;

use crate::modules::books::{BookController, BookDocumentRepository, BookRepository};
use crate::modules::members::{MemberController, MemberDocumentRepository};
use crate::view::LibraryView;

/// Repositories and controllers wired to one store connection.
pub struct Library {
    store: Option<DocumentStore>,
    view: Arc<dyn LibraryView>,
    pub books: BookController,
    pub members: MemberController,
}

impl Library {
    /// Open the configured document store and wire everything to `view`.
    pub async fn connect(settings: &StoreSettings, view: Arc<dyn LibraryView>) -> StoreResult<Self> {
        let store = DocumentStore::connect(settings).await?;
        let book_collection = store.collection(&settings.book_collection);
        let member_collection = store.collection(&settings.member_collection);
        Ok(Self::assemble(
            Some(store),
            book_collection,
            member_collection,
            view,
        ))
    }

    /// Library over process-local collections. Nothing survives the process.
    pub fn in_memory(view: Arc<dyn LibraryView>) -> Self {
        Self::assemble(
            None,
            Arc::new(MemoryCollection::new("book")),
            Arc::new(MemoryCollection::new("member")),
            view,
        )
    }

    fn assemble(
        store: Option<DocumentStore>,
        book_collection: Arc<dyn DocumentCollection>,
        member_collection: Arc<dyn DocumentCollection>,
        view: Arc<dyn LibraryView>,
    ) -> Self {
        let book_repository: Arc<dyn BookRepository> =
            Arc::new(BookDocumentRepository::new(book_collection));
        let member_repository = Arc::new(MemberDocumentRepository::new(
            member_collection,
            book_repository.clone(),
        ));

        Self {
            store,
            books: BookController::new(view.clone(), book_repository.clone()),
            members: MemberController::new(view.clone(), member_repository, book_repository),
            view,
        }
    }

    /// Initial screen: refresh the borrowable books, then list books and
    /// members.
    pub async fn startup(&self) -> StoreResult<()> {
        self.view.refresh_book_dropdown();
        self.books.all_books().await?;
        self.members.all_members().await?;
        Ok(())
    }

    /// Release the store connection, if any.
    pub async fn close(self) {
        if let Some(store) = self.store {
            store.close().await;
        }
    }
}
