pub mod books;
pub mod members;
