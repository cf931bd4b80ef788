//! Callback surface the controllers report outcomes to.

pub mod console;
pub mod recording;

pub use console::{ConsoleView, OutputFormat};
pub use recording::{RecordingView, ViewEvent};

use crate::modules::books::models::Book;
use crate::modules::members::models::Member;

/// Presentation layer notified by the controllers.
///
/// Implementations render; they never call back into repositories.
pub trait LibraryView: Send + Sync {
    fn book_added(&self, book: &Book);

    fn book_removed(&self, book: &Book);

    fn show_all_books(&self, books: &[Book]);

    fn show_searched_book(&self, book: &Book);

    fn show_book_not_found(&self, message: &str, book: Option<&Book>);

    /// Validation or conflict error. `book` is the entity the error is about,
    /// which for conflicts is the already stored one.
    fn show_book_error(&self, message: &str, book: Option<&Book>);

    fn member_added(&self, member: &Member);

    fn member_removed(&self, member: &Member);

    fn show_all_members(&self, members: &[Member]);

    fn show_searched_member(&self, member: &Member);

    fn show_member_not_found(&self, message: &str, member: Option<&Member>);

    fn show_member_error(&self, message: &str, member: Option<&Member>);

    /// The set of books offered for borrowing may have changed.
    fn refresh_book_dropdown(&self);
}
