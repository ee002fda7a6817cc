use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LibrisError, Result};
use crate::input::{self, Isbn, MAX_DESCRIPTION_CHARS};

/// The two genre records the catalog can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenreKind {
    Fiction,
    Nonfiction,
}

impl GenreKind {
    /// Fiction files books under a "category", Nonfiction under a
    /// "subject"; the prompt wording follows suit.
    pub fn category_label(&self) -> &'static str {
        match self {
            Self::Fiction => "category",
            Self::Nonfiction => "subject",
        }
    }
}

impl fmt::Display for GenreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fiction => f.write_str("Fiction"),
            Self::Nonfiction => f.write_str("Nonfiction"),
        }
    }
}

impl FromStr for GenreKind {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self> {
        match input::title_case(s).as_str() {
            "Fiction" => Ok(Self::Fiction),
            "Nonfiction" => Ok(Self::Nonfiction),
            _ => Err(LibrisError::InvalidGenre(s.to_string())),
        }
    }
}

/// A genre record and its category map (category name → filed ISBNs, in
/// filing order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub kind: GenreKind,
    pub description: String,
    categories: HashMap<String, Vec<Isbn>>,
    category_order: Vec<String>,
}

impl Genre {
    /// Description is stored truncated to [`MAX_DESCRIPTION_CHARS`].
    pub fn new(kind: GenreKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: input::truncate_chars(&description.into(), MAX_DESCRIPTION_CHARS),
            categories: HashMap::new(),
            category_order: Vec::new(),
        }
    }

    /// Idempotently ensure the category exists.
    pub fn add_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.categories.contains_key(&name) {
            self.category_order.push(name.clone());
            self.categories.insert(name, Vec::new());
        }
    }

    /// File a book under a category, creating the category if needed.
    pub fn file_book(&mut self, category: &str, isbn: Isbn) {
        self.add_category(category);
        if let Some(filed) = self.categories.get_mut(category) {
            filed.push(isbn);
        }
    }

    /// Categories in the order they were first added, with their filed
    /// ISBNs.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Isbn])> {
        self.category_order.iter().map(|name| {
            let filed = self.categories.get(name).map(Vec::as_slice).unwrap_or(&[]);
            (name.as_str(), filed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Fiction".parse::<GenreKind>().unwrap(), GenreKind::Fiction);
        assert_eq!("nonfiction".parse::<GenreKind>().unwrap(), GenreKind::Nonfiction);
        assert!("Mystery".parse::<GenreKind>().is_err());
    }

    #[test]
    fn test_description_truncated() {
        let genre = Genre::new(GenreKind::Fiction, "d".repeat(250));
        assert_eq!(genre.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_add_category_idempotent() {
        let mut genre = Genre::new(GenreKind::Fiction, "Invented stories.");
        genre.add_category("Scifi");
        genre.add_category("Scifi");
        assert_eq!(genre.categories().count(), 1);
    }

    #[test]
    fn test_file_book_creates_category() {
        let mut genre = Genre::new(GenreKind::Fiction, "");
        let isbn = Isbn::parse("978-92-95055-02-5").unwrap();
        genre.file_book("Scifi", isbn.clone());

        let (name, filed) = genre.categories().next().unwrap();
        assert_eq!(name, "Scifi");
        assert_eq!(filed, [isbn]);
    }

    #[test]
    fn test_category_order_preserved() {
        let mut genre = Genre::new(GenreKind::Nonfiction, "");
        genre.add_category("History");
        genre.add_category("Biology");
        let names: Vec<&str> = genre.categories().map(|(name, _)| name).collect();
        assert_eq!(names, ["History", "Biology"]);
    }
}
