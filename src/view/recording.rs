use std::sync::{Mutex, MutexGuard};

use super::LibraryView;
use crate::modules::books::models::Book;
use crate::modules::members::models::Member;

/// One callback received by a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    BookAdded(Book),
    BookRemoved(Book),
    AllBooks(Vec<Book>),
    SearchedBook(Book),
    BookNotFound { message: String, book: Option<Book> },
    BookError { message: String, book: Option<Book> },
    MemberAdded(Member),
    MemberRemoved(Member),
    AllMembers(Vec<Member>),
    SearchedMember(Member),
    MemberNotFound { message: String, member: Option<Member> },
    MemberError { message: String, member: Option<Member> },
    BookDropdownRefreshed,
}

/// View that keeps every notification in arrival order.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ViewEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: ViewEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<ViewEvent> {
        self.lock().last().cloned()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.lock().iter().filter(|event| predicate(event)).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl LibraryView for RecordingView {
    fn book_added(&self, book: &Book) {
        self.push(ViewEvent::BookAdded(book.clone()));
    }

    fn book_removed(&self, book: &Book) {
        self.push(ViewEvent::BookRemoved(book.clone()));
    }

    fn show_all_books(&self, books: &[Book]) {
        self.push(ViewEvent::AllBooks(books.to_vec()));
    }

    fn show_searched_book(&self, book: &Book) {
        self.push(ViewEvent::SearchedBook(book.clone()));
    }

    fn show_book_not_found(&self, message: &str, book: Option<&Book>) {
        self.push(ViewEvent::BookNotFound {
            message: message.to_string(),
            book: book.cloned(),
        });
    }

    fn show_book_error(&self, message: &str, book: Option<&Book>) {
        self.push(ViewEvent::BookError {
            message: message.to_string(),
            book: book.cloned(),
        });
    }

    fn member_added(&self, member: &Member) {
        self.push(ViewEvent::MemberAdded(member.clone()));
    }

    fn member_removed(&self, member: &Member) {
        self.push(ViewEvent::MemberRemoved(member.clone()));
    }

    fn show_all_members(&self, members: &[Member]) {
        self.push(ViewEvent::AllMembers(members.to_vec()));
    }

    fn show_searched_member(&self, member: &Member) {
        self.push(ViewEvent::SearchedMember(member.clone()));
    }

    fn show_member_not_found(&self, message: &str, member: Option<&Member>) {
        self.push(ViewEvent::MemberNotFound {
            message: message.to_string(),
            member: member.cloned(),
        });
    }

    fn show_member_error(&self, message: &str, member: Option<&Member>) {
        self.push(ViewEvent::MemberError {
            message: message.to_string(),
            member: member.cloned(),
        });
    }

    fn refresh_book_dropdown(&self) {
        self.push(ViewEvent::BookDropdownRefreshed);
    }
}
