//! Book catalogue: entity, persistence and business rules.

pub mod controller;
pub mod models;
pub mod repository;

pub use controller::BookController;
pub use models::Book;
pub use repository::{BookDocumentRepository, BookRepository};
