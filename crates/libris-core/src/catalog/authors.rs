use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::catalog::Upserted;
use crate::models::Author;

/// Author records keyed by name, listed in insertion order.
#[derive(Debug, Default)]
pub struct AuthorRegistry {
    authors: HashMap<String, Author>,
    order: Vec<String>,
}

impl AuthorRegistry {
    /// Create-or-get by name. For a known name the stored record is
    /// returned unchanged and the biography argument is discarded.
    pub fn add(&mut self, name: &str, biography: &str) -> Upserted<&Author> {
        match self.authors.entry(name.to_string()) {
            Entry::Occupied(slot) => Upserted::Existing(slot.into_mut()),
            Entry::Vacant(slot) => {
                self.order.push(name.to_string());
                Upserted::Created(slot.insert(Author::new(name, biography)))
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<&Author> {
        self.authors.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.order.iter().filter_map(|name| self.authors.get(name))
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
