use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LibrisError, Result};

// 13-digit ISBN the way the catalog stores it: 978-92-95055-02-5
static ISBN_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-\d{2}-\d{5}-\d{2}-\d$").unwrap());

// Two letters followed by five digits: AZ12345
static LIBRARY_ID_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{2}\d{5}$").unwrap());

/// Maximum stored length of an author biography, in characters.
pub const MAX_BIOGRAPHY_CHARS: usize = 300;

/// Maximum stored length of a genre description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// A validated catalog ISBN. Grouping is fixed (3-2-5-2-1 digits); there
/// is no checksum validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if ISBN_FORMAT.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(LibrisError::InvalidIsbn(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A validated library membership ID, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryId(String);

impl LibraryId {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if LIBRARY_ID_FORMAT.is_match(trimmed) {
            Ok(Self(trimmed.to_uppercase()))
        } else {
            Err(LibrisError::InvalidLibraryId(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LibraryId {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Uppercase the first letter of every word, lowercase the rest, trim the
/// ends. A word starts after any non-alphabetic character.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.trim().chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Uppercase the first character, lowercase everything else, trim the ends.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.extend(chars.flat_map(char::to_lowercase));
            out
        }
        None => String::new(),
    }
}

/// Keep at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
