use serde::{Deserialize, Serialize};

use crate::modules::members::models::Member;

/// A catalogued book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Primary key, positive once persisted
    pub id: i32,
    /// Natural key used for search and delete
    pub serial_number: String,
    /// Title of the book
    pub name: String,
    /// Author of the book
    pub author_name: String,
    pub genre: String,
    /// Members currently holding this book. Never persisted; repositories
    /// always hand this back empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub borrowers: Vec<Member>,
}

impl Book {
    pub fn new(
        id: i32,
        serial_number: impl Into<String>,
        name: impl Into<String>,
        author_name: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id,
            serial_number: serial_number.into(),
            name: name.into(),
            author_name: author_name.into(),
            genre: genre.into(),
            borrowers: Vec::new(),
        }
    }

    /// Copy of this book that shares no borrower state with the original.
    pub fn detached(&self) -> Self {
        Self {
            borrowers: Vec::new(),
            ..self.clone()
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("serialNumber", &self.serial_number),
            ("name", &self.name),
            ("authorName", &self.author_name),
            ("genre", &self.genre),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}
