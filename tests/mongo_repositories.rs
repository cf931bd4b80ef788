//! Repositories and controllers over a live MongoDB. Run with
//! `cargo test -p libris-app -- --ignored` once a server answers on
//! localhost:27017 (or on `LIBRIS_TEST_MONGO_HOST` / `LIBRIS_TEST_MONGO_PORT`).

use std::sync::Arc;

use libris_app::modules::books::{BookDocumentRepository, BookRepository};
use libris_app::modules::members::{MemberDocumentRepository, MemberRepository};
use libris_app::view::{RecordingView, ViewEvent};
use libris_app::{Book, Library, Member};
use libris_db::{doc, DocumentCollection, DocumentStore, StoreError};
use libris_kernel::settings::StoreSettings;

fn settings(database: &str) -> StoreSettings {
    StoreSettings {
        host: std::env::var("LIBRIS_TEST_MONGO_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("LIBRIS_TEST_MONGO_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(27017),
        database: database.to_string(),
        ..StoreSettings::default()
    }
}

struct Fixture {
    store: DocumentStore,
    book_collection: Arc<dyn DocumentCollection>,
    member_collection: Arc<dyn DocumentCollection>,
    books: Arc<BookDocumentRepository>,
    members: MemberDocumentRepository,
}

impl Fixture {
    async fn open(database: &str) -> Self {
        let settings = settings(database);
        let store = DocumentStore::connect(&settings).await.unwrap();
        store.drop_database().await.unwrap();

        let book_collection = store.collection(&settings.book_collection);
        let member_collection = store.collection(&settings.member_collection);
        let books = Arc::new(BookDocumentRepository::new(book_collection.clone()));
        let members = MemberDocumentRepository::new(member_collection.clone(), books.clone());
        Self {
            store,
            book_collection,
            member_collection,
            books,
            members,
        }
    }

    async fn close(self) {
        self.store.drop_database().await.unwrap();
        self.store.close().await;
    }
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn book_save_inserts_then_replaces() {
    let fixture = Fixture::open("libris_it_book_save").await;

    fixture
        .books
        .save(&Book::new(1, "123", "Book1", "Author1", "Genre1"))
        .await
        .unwrap();
    fixture
        .books
        .save(&Book::new(1, "123", "Book1 Revised", "Author1", "Genre1"))
        .await
        .unwrap();

    assert_eq!(
        fixture.books.find_all().await.unwrap(),
        vec![Book::new(1, "123", "Book1 Revised", "Author1", "Genre1")]
    );
    assert_eq!(
        fixture.books.find_by_serial_number("123").await.unwrap(),
        Some(Book::new(1, "123", "Book1 Revised", "Author1", "Genre1"))
    );

    fixture.books.delete("123").await.unwrap();
    assert!(fixture.books.find_by_id(1).await.unwrap().is_none());

    fixture.close().await;
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn member_reads_back_with_borrowed_book() {
    let fixture = Fixture::open("libris_it_member_book").await;
    let book = Book::new(1, "123", "Book1", "Author1", "Genre1");
    fixture.books.save(&book).await.unwrap();

    fixture
        .members
        .save(&Member::new(1, "owais", "owais@gmail.com", Some(book.clone())))
        .await
        .unwrap();
    fixture
        .members
        .save(&Member::new(1, "owais", "owais@example.org", Some(book.clone())))
        .await
        .unwrap();

    let members = fixture.members.find_all().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, "owais@example.org");
    assert_eq!(members[0].book, Some(book));

    fixture.members.delete(1).await.unwrap();
    assert!(fixture.members.find_by_id(1).await.unwrap().is_none());

    fixture.close().await;
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn incomplete_documents_fail_the_listing() {
    let fixture = Fixture::open("libris_it_integrity").await;

    fixture
        .book_collection
        .insert_one(doc! { "id": 1, "serialNumber": "123", "name": "Book1" })
        .await
        .unwrap();
    fixture
        .member_collection
        .insert_one(doc! { "id": 1, "name": "owais" })
        .await
        .unwrap();

    let books = fixture.books.find_all().await.unwrap_err();
    assert!(matches!(books, StoreError::MissingField { entity: "Book", .. }));
    let members = fixture.members.find_all().await.unwrap_err();
    assert!(matches!(members, StoreError::MissingField { entity: "Member", field: "email" }));

    fixture.close().await;
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn controllers_lend_a_book_through_the_store() {
    let settings = settings("libris_it_controllers");
    Fixture::open("libris_it_controllers").await.store.close().await;
    let view = Arc::new(RecordingView::new());
    let library = Library::connect(&settings, view.clone()).await.unwrap();

    library
        .books
        .new_book(&Book::new(1, "123", "Book1", "Author1", "Genre1"))
        .await
        .unwrap();
    library
        .members
        .new_member(&Member::new(1, "owais", "owais@gmail.com", None))
        .await
        .unwrap();
    library
        .members
        .borrow_book(
            Some(&Member::new(1, "", "", None)),
            Some(&Book::new(1, "", "", "", "")),
        )
        .await
        .unwrap();

    let member = library.members.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(member.book.map(|book| book.serial_number), Some("123".to_string()));
    assert!(!view
        .events()
        .iter()
        .any(|event| matches!(event, ViewEvent::BookError { .. } | ViewEvent::MemberError { .. })));

    library.close().await;
    let store = DocumentStore::connect(&settings).await.unwrap();
    store.drop_database().await.unwrap();
    store.close().await;
}
