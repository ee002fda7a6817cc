use std::fmt;

use thiserror::Error;

/// All errors that can occur in libris-core.
#[derive(Debug, Error)]
pub enum LibrisError {
    #[error("invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("invalid library ID: {0}")]
    InvalidLibraryId(String),

    #[error("invalid genre type: {0}")]
    InvalidGenre(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Genre not found: {0}")]
    GenreNotFound(String),

    #[error("Duplicate ISBN: {0}")]
    DuplicateIsbn(String),

    #[error("Book unavailable: {0}")]
    BookUnavailable(String),

    #[error("Not on loan: {isbn} for {library_id} ({reason})")]
    NotOnLoan {
        library_id: String,
        isbn: String,
        reason: NotOnLoanReason,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Why a check-in was refused even though the user exists. The two causes
/// are reported as the same error kind but carry distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotOnLoanReason {
    /// The user has no active loans at all.
    NoActiveLoans,
    /// The user has active loans, but none for this ISBN.
    IsbnNotBorrowed,
}

impl fmt::Display for NotOnLoanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveLoans => write!(f, "no active loans for this user"),
            Self::IsbnNotBorrowed => write!(f, "ISBN not among this user's loans"),
        }
    }
}

/// Exit codes matching the CLI specification.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    FileSystemError = 4,
}

pub type Result<T> = std::result::Result<T, LibrisError>;
