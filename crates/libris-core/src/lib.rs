pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod models;

pub use config::{AppConfig, LibraryConfig, SessionConfig};
pub use error::{ExitCode, LibrisError, NotOnLoanReason, Result};
pub use models::*;

pub use catalog::{
    AddBookOutcome, AuthorRegistry, BookDraft, BookRegistry, CheckoutReceipt, GenreRegistry,
    Library, Loan, LoanLedger, ReturnReceipt, Upserted, UserRegistry,
};
pub use input::{
    Isbn, LibraryId, MAX_BIOGRAPHY_CHARS, MAX_DESCRIPTION_CHARS, capitalize, title_case,
    truncate_chars,
};
