//! Library members and borrowing.

pub mod controller;
pub mod models;
pub mod repository;

pub use controller::MemberController;
pub use models::Member;
pub use repository::{MemberDocumentRepository, MemberRepository};
