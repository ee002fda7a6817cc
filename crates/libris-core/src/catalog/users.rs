use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::catalog::Upserted;
use crate::input::LibraryId;
use crate::models::User;

/// User records keyed by library ID, listed in registration order.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<LibraryId, User>,
    order: Vec<LibraryId>,
}

impl UserRegistry {
    /// Create-or-get by library ID. For a known ID the stored record is
    /// returned and the name argument is ignored.
    pub fn add_or_get(&mut self, name: &str, library_id: LibraryId) -> Upserted<&User> {
        match self.users.entry(library_id.clone()) {
            Entry::Occupied(slot) => Upserted::Existing(slot.into_mut()),
            Entry::Vacant(slot) => {
                self.order.push(library_id.clone());
                Upserted::Created(slot.insert(User::new(name, library_id)))
            }
        }
    }

    pub fn find(&self, library_id: &LibraryId) -> Option<&User> {
        self.users.get(library_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|id| self.users.get(id))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
