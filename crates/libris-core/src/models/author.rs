use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::{self, MAX_BIOGRAPHY_CHARS};

/// An author record, deduplicated by name in the author registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub biography: String,
    pub added_at: DateTime<Utc>,
}

impl Author {
    /// Biography is stored truncated to [`MAX_BIOGRAPHY_CHARS`].
    pub fn new(name: impl Into<String>, biography: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            biography: input::truncate_chars(&biography.into(), MAX_BIOGRAPHY_CHARS),
            added_at: Utc::now(),
        }
    }
}
