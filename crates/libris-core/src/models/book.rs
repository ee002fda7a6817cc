use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::Isbn;
use crate::models::GenreKind;

/// A catalog record. `available` flips only through [`Book::borrow`] and
/// [`Book::return_book`]; catalog membership never changes once added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    pub genre: GenreKind,
    pub category: String,
    pub available: bool,
    pub added_at: DateTime<Utc>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Isbn,
        genre: GenreKind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            isbn,
            title: title.into(),
            author: author.into(),
            genre,
            category: category.into(),
            available: true,
            added_at: Utc::now(),
        }
    }

    /// Mark the book as loaned out. Returns false if it already is.
    pub fn borrow(&mut self) -> bool {
        if self.available {
            self.available = false;
            true
        } else {
            false
        }
    }

    /// Put the book back on the shelf.
    pub fn return_book(&mut self) {
        self.available = true;
    }
}
