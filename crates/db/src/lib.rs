//! Document store access for Libris.
//!
//! Repositories talk to a [`DocumentCollection`]; [`DocumentStore`] hands out
//! MongoDB-backed collections and [`MemoryCollection`] keeps documents in
//! process for tests and scratch runs.

pub mod collection;
pub mod error;
pub mod fields;
pub mod memory;
pub mod mongo;

pub use collection::{eq, DocumentCollection};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCollection;
pub use mongo::{DocumentStore, MongoCollection};

pub use mongodb::bson::{self, doc, Bson, Document};
