use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::{Isbn, LibraryId};

/// One active loan. The ledger key is the (library ID, ISBN) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub isbn: Isbn,
    pub loaned_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(isbn: Isbn) -> Self {
        Self {
            isbn,
            loaned_at: Utc::now(),
        }
    }
}

/// The authoritative record of who currently holds which book. A user's
/// entry is removed together with their last loan, so every entry the
/// ledger reports is non-empty.
#[derive(Debug, Default)]
pub struct LoanLedger {
    loans: BTreeMap<LibraryId, Vec<Loan>>,
}

impl LoanLedger {
    pub fn add(&mut self, library_id: &LibraryId, loan: Loan) {
        self.loans.entry(library_id.clone()).or_default().push(loan);
    }

    pub fn remove(&mut self, library_id: &LibraryId, isbn: &Isbn) -> Option<Loan> {
        let loans = self.loans.get_mut(library_id)?;
        let pos = loans.iter().position(|loan| &loan.isbn == isbn)?;
        let loan = loans.remove(pos);
        if loans.is_empty() {
            self.loans.remove(library_id);
        }
        Some(loan)
    }

    pub fn contains(&self, library_id: &LibraryId, isbn: &Isbn) -> bool {
        self.loans_for(library_id).iter().any(|loan| &loan.isbn == isbn)
    }

    /// Whether the user holds anything at all.
    pub fn has_loans(&self, library_id: &LibraryId) -> bool {
        !self.loans_for(library_id).is_empty()
    }

    /// The user's active loans, oldest first. Empty for unknown IDs.
    pub fn loans_for(&self, library_id: &LibraryId) -> &[Loan] {
        self.loans.get(library_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Users with at least one active loan, ordered by library ID.
    pub fn iter(&self) -> impl Iterator<Item = (&LibraryId, &[Loan])> {
        self.loans
            .iter()
            .filter(|(_, loans)| !loans.is_empty())
            .map(|(id, loans)| (id, loans.as_slice()))
    }

    /// Number of active loans across all users.
    pub fn active_count(&self) -> usize {
        self.loans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}
