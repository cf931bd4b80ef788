use std::sync::Arc;

use libris_db::StoreResult;

use super::models::Book;
use super::repository::BookRepository;
use crate::view::LibraryView;

/// Business rules for the book catalogue.
///
/// Rejections are reported to the view; only store failures come back as
/// `Err`.
pub struct BookController {
    view: Arc<dyn LibraryView>,
    books: Arc<dyn BookRepository>,
}

impl BookController {
    pub fn new(view: Arc<dyn LibraryView>, books: Arc<dyn BookRepository>) -> Self {
        Self { view, books }
    }

    pub async fn new_book(&self, book: &Book) -> StoreResult<()> {
        if book.id <= 0 {
            tracing::warn!(id = book.id, "rejected book with non-positive id");
            self.view
                .show_book_error("ID must be a positive number", Some(book));
            return Ok(());
        }

        if let Some(existing) = self.books.find_by_serial_number(&book.serial_number).await? {
            tracing::warn!(
                serial_number = %book.serial_number,
                existing = existing.id,
                "rejected book with duplicate serial number"
            );
            self.view.show_book_error(
                &format!(
                    "Already existing book with serial number {}",
                    book.serial_number
                ),
                Some(&existing),
            );
            return Ok(());
        }

        if let Some(existing) = self.books.find_by_id(book.id).await? {
            tracing::warn!(id = book.id, "rejected book with duplicate id");
            self.view
                .show_book_error(&format!("ID Already exists {}", book.id), Some(&existing));
            return Ok(());
        }

        self.books.save(book).await?;
        tracing::info!(id = book.id, serial_number = %book.serial_number, "book added");
        self.view.book_added(book);
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        self.books.find_by_id(id).await
    }

    pub async fn all_books(&self) -> StoreResult<Vec<Book>> {
        let books = self.books.find_all().await?;
        self.view.show_all_books(&books);
        Ok(books)
    }

    pub async fn search_book(&self, serial_number: &str) -> StoreResult<()> {
        match self.books.find_by_serial_number(serial_number).await? {
            Some(book) => self.view.show_searched_book(&book),
            None => self.view.show_book_not_found(
                &format!("No existing book with serial number {}", serial_number),
                None,
            ),
        }
        Ok(())
    }

    pub async fn delete_book(&self, book: &Book) -> StoreResult<()> {
        if self
            .books
            .find_by_serial_number(&book.serial_number)
            .await?
            .is_none()
        {
            self.view.show_book_not_found(
                &format!("No existing book with serial number {}", book.serial_number),
                Some(book),
            );
            return Ok(());
        }

        self.books.delete(&book.serial_number).await?;
        tracing::info!(serial_number = %book.serial_number, "book removed");
        self.view.book_removed(book);
        Ok(())
    }

    /// Replace a stored book, keyed by id.
    ///
    /// Success is announced through `book_added`.
    pub async fn update_book(&self, book: &Book) -> StoreResult<()> {
        let Some(existing) = self.books.find_by_id(book.id).await? else {
            self.view.show_book_not_found(
                &format!("No existing book with ID {}", book.id),
                Some(book),
            );
            return Ok(());
        };

        if existing.serial_number != book.serial_number {
            let taken = self
                .books
                .find_by_serial_number(&book.serial_number)
                .await?
                .is_some_and(|other| other.id != book.id);
            if taken {
                tracing::warn!(
                    id = book.id,
                    serial_number = %book.serial_number,
                    "rejected update to a serial number already in use"
                );
                self.view
                    .show_book_error("Serial number already exists", Some(book));
                return Ok(());
            }
        }

        self.books.save(book).await?;
        tracing::info!(id = book.id, "book updated");
        self.view.book_added(book);
        Ok(())
    }
}
