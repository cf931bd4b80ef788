use serde::{Deserialize, Serialize};

use crate::modules::books::models::Book;

/// A library member, holding at most one borrowed book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Primary key, positive once persisted
    pub id: i32,
    pub name: String,
    /// Contact address; meant to be unique but not checked on insert
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

impl Member {
    pub fn new(id: i32, name: impl Into<String>, email: impl Into<String>, book: Option<Book>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            book,
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("name", &self.name), ("email", &self.email)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }
}
