use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::LibraryId;

/// A registered library member. The member's borrowed books are a
/// projection of the loan ledger, not a field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub library_id: LibraryId,
    pub registered_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, library_id: LibraryId) -> Self {
        Self {
            name: name.into(),
            library_id,
            registered_at: Utc::now(),
        }
    }
}
