use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::json;

use super::LibraryView;
use crate::modules::books::models::Book;
use crate::modules::members::models::Member;

/// How the console renders notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// Terminal presentation adapter.
///
/// Outcomes go to the output stream, errors and not-found reports to the
/// error stream.
pub struct ConsoleView {
    format: OutputFormat,
    out: Sink,
    err: Sink,
    failed: AtomicBool,
}

impl ConsoleView {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writers(format, Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    pub fn with_writers(
        format: OutputFormat,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            format,
            out: Mutex::new(out),
            err: Mutex::new(err),
            failed: AtomicBool::new(false),
        }
    }

    /// Whether any error or not-found report has been shown.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    fn write(sink: &Sink, text: &str) {
        let mut writer = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(writer, "{}", text).and_then(|_| writer.flush()) {
            tracing::warn!(error = %err, "failed to write console output");
        }
    }

    fn emit(&self, text: impl FnOnce() -> String, value: impl FnOnce() -> serde_json::Value) {
        match self.format {
            OutputFormat::Text => Self::write(&self.out, &text()),
            OutputFormat::Json => Self::write(&self.out, &value().to_string()),
        }
    }

    fn fail(&self, text: impl FnOnce() -> String, value: impl FnOnce() -> serde_json::Value) {
        self.failed.store(true, Ordering::Relaxed);
        match self.format {
            OutputFormat::Text => Self::write(&self.err, &text()),
            OutputFormat::Json => Self::write(&self.err, &value().to_string()),
        }
    }
}

fn book_header() -> String {
    format!(
        "{:>5}  {:<12}  {:<28}  {:<20}  {}",
        "ID", "SERIAL", "NAME", "AUTHOR", "GENRE"
    )
}

fn book_row(book: &Book) -> String {
    format!(
        "{:>5}  {:<12}  {:<28}  {:<20}  {}",
        book.id, book.serial_number, book.name, book.author_name, book.genre
    )
}

fn member_header() -> String {
    format!("{:>5}  {:<20}  {:<28}  {}", "ID", "NAME", "EMAIL", "BOOK")
}

fn member_row(member: &Member) -> String {
    let borrowed = member.book.as_ref().map_or("None", |book| book.name.as_str());
    format!(
        "{:>5}  {:<20}  {:<28}  {}",
        member.id, member.name, member.email, borrowed
    )
}

fn table<T>(header: String, rows: &[T], row: impl Fn(&T) -> String) -> String {
    let mut lines = vec![header];
    lines.extend(rows.iter().map(row));
    lines.join("\n")
}

fn with_book_id(message: &str, book: Option<&Book>) -> String {
    match book {
        Some(book) => format!("{} (Book ID: {})", message, book.id),
        None => message.to_string(),
    }
}

fn with_member_id(message: &str, member: Option<&Member>) -> String {
    match member {
        Some(member) => format!("{} (Member ID: {})", message, member.id),
        None => message.to_string(),
    }
}

impl LibraryView for ConsoleView {
    fn book_added(&self, book: &Book) {
        self.emit(
            || format!("Book saved successfully\n{}\n{}", book_header(), book_row(book)),
            || json!({ "event": "bookAdded", "book": book }),
        );
    }

    fn book_removed(&self, book: &Book) {
        self.emit(
            || format!("Book removed successfully (serial number {})", book.serial_number),
            || json!({ "event": "bookRemoved", "book": book }),
        );
    }

    fn show_all_books(&self, books: &[Book]) {
        self.emit(
            || table(book_header(), books, book_row),
            || json!({ "event": "allBooks", "books": books }),
        );
    }

    fn show_searched_book(&self, book: &Book) {
        self.emit(
            || table(book_header(), std::slice::from_ref(book), book_row),
            || json!({ "event": "searchedBook", "book": book }),
        );
    }

    fn show_book_not_found(&self, message: &str, book: Option<&Book>) {
        self.fail(
            || message.to_string(),
            || json!({ "event": "bookNotFound", "message": message, "book": book }),
        );
    }

    fn show_book_error(&self, message: &str, book: Option<&Book>) {
        self.fail(
            || with_book_id(message, book),
            || json!({ "event": "bookError", "message": message, "book": book }),
        );
    }

    fn member_added(&self, member: &Member) {
        self.emit(
            || format!("Member added successfully\n{}\n{}", member_header(), member_row(member)),
            || json!({ "event": "memberAdded", "member": member }),
        );
    }

    fn member_removed(&self, member: &Member) {
        self.emit(
            || format!("Member removed successfully (id {})", member.id),
            || json!({ "event": "memberRemoved", "member": member }),
        );
    }

    fn show_all_members(&self, members: &[Member]) {
        self.emit(
            || table(member_header(), members, member_row),
            || json!({ "event": "allMembers", "members": members }),
        );
    }

    fn show_searched_member(&self, member: &Member) {
        self.emit(
            || table(member_header(), std::slice::from_ref(member), member_row),
            || json!({ "event": "searchedMember", "member": member }),
        );
    }

    fn show_member_not_found(&self, message: &str, member: Option<&Member>) {
        self.fail(
            || message.to_string(),
            || json!({ "event": "memberNotFound", "message": message, "member": member }),
        );
    }

    fn show_member_error(&self, message: &str, member: Option<&Member>) {
        self.fail(
            || with_member_id(message, member),
            || json!({ "event": "memberError", "message": message, "member": member }),
        );
    }

    fn refresh_book_dropdown(&self) {
        // Nothing is cached on the terminal; the next listing reads fresh data.
        tracing::debug!("book selection refreshed");
    }
}
