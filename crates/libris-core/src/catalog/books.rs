use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{LibrisError, Result};
use crate::input::Isbn;
use crate::models::Book;

/// Book records keyed by ISBN, listed in insertion order. Records are
/// never deleted; only their availability flag changes.
#[derive(Debug, Default)]
pub struct BookRegistry {
    books: HashMap<Isbn, Book>,
    order: Vec<Isbn>,
}

impl BookRegistry {
    /// Adding an ISBN that is already present is refused and never
    /// replaces the stored record.
    pub fn add(&mut self, book: Book) -> Result<&Book> {
        match self.books.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Err(LibrisError::DuplicateIsbn(book.isbn.to_string())),
            Entry::Vacant(slot) => {
                self.order.push(book.isbn.clone());
                Ok(slot.insert(book))
            }
        }
    }

    pub fn contains(&self, isbn: &Isbn) -> bool {
        self.books.contains_key(isbn)
    }

    pub fn find(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn find_mut(&mut self, isbn: &Isbn) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.order.iter().filter_map(|isbn| self.books.get(isbn))
    }

    /// Case-insensitive containment match against the title.
    pub fn search_by_title(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive containment match against the author's name.
    pub fn search_by_author(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|book| book.author.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
