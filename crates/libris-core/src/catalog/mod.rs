mod authors;
mod books;
mod genres;
mod loans;
mod users;

pub use authors::AuthorRegistry;
pub use books::BookRegistry;
pub use genres::GenreRegistry;
pub use loans::{Loan, LoanLedger};
pub use users::UserRegistry;

use crate::error::{LibrisError, NotOnLoanReason, Result};
use crate::input::{Isbn, LibraryId};
use crate::models::{Author, Book, Genre, GenreKind, User};

/// Result of a create-or-get operation. The caller decides whether the
/// "already exists" case deserves a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted<T> {
    Created(T),
    Existing(T),
}

impl<T> Upserted<T> {
    pub fn record(self) -> T {
        match self {
            Self::Created(record) | Self::Existing(record) => record,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Validated input for adding one book. The biography is consulted only
/// when the author is new; the genre description only when the genre is.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub biography: String,
    pub isbn: Isbn,
    pub genre: GenreKind,
    pub genre_description: String,
    pub category: String,
}

/// What `add_book` did, including whether author and genre records were
/// created along the way, for the presentation layer's messaging.
#[derive(Debug, Clone)]
pub enum AddBookOutcome {
    Added {
        title: String,
        author: String,
        isbn: Isbn,
        new_author: bool,
        new_genre: bool,
    },
    /// The ISBN was already cataloged; the stored record is untouched.
    Duplicate { isbn: Isbn, title: String },
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub user_name: String,
    pub library_id: LibraryId,
    pub new_user: bool,
}

/// Outcome of a successful check-in.
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub title: String,
    pub isbn: Isbn,
    pub user_name: String,
    pub library_id: LibraryId,
}

/// The in-memory catalog: book, author, genre and user registries plus
/// the loan ledger, driven through one explicitly constructed value.
#[derive(Debug, Default)]
pub struct Library {
    authors: AuthorRegistry,
    genres: GenreRegistry,
    books: BookRegistry,
    users: UserRegistry,
    ledger: LoanLedger,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Catalog ───────────────────────────────────────────

    /// Add one book, creating its author and genre records as needed and
    /// filing it under the genre's category. A duplicate ISBN leaves
    /// every registry untouched.
    pub fn add_book(&mut self, draft: BookDraft) -> AddBookOutcome {
        let BookDraft {
            title,
            author,
            biography,
            isbn,
            genre,
            genre_description,
            category,
        } = draft;

        let book = Book::new(title.clone(), author.clone(), isbn.clone(), genre, category.clone());
        match self.books.add(book) {
            Err(_) => {
                let stored_title = self
                    .books
                    .find(&isbn)
                    .map(|existing| existing.title.clone())
                    .unwrap_or_default();
                AddBookOutcome::Duplicate {
                    isbn,
                    title: stored_title,
                }
            }
            Ok(_) => {
                let new_author = self.authors.add(&author, &biography).was_created();

                let (genre_record, new_genre) = self.genres.get_or_add(genre, &genre_description);
                genre_record.file_book(&category, isbn.clone());

                AddBookOutcome::Added {
                    title,
                    author,
                    isbn,
                    new_author,
                    new_genre,
                }
            }
        }
    }

    pub fn add_author(&mut self, name: &str, biography: &str) -> Upserted<&Author> {
        self.authors.add(name, biography)
    }

    pub fn add_genre(&mut self, kind: GenreKind, description: &str) -> Upserted<&Genre> {
        self.genres.add(kind, description)
    }

    /// Idempotently add a category to an existing genre record.
    pub fn add_category(&mut self, kind: GenreKind, category: &str) -> Result<()> {
        match self.genres.find_mut(kind) {
            Some(genre) => {
                genre.add_category(category);
                Ok(())
            }
            None => Err(LibrisError::GenreNotFound(kind.to_string())),
        }
    }

    pub fn add_user(&mut self, name: &str, library_id: LibraryId) -> Upserted<&User> {
        self.users.add_or_get(name, library_id)
    }

    // ─── Circulation ───────────────────────────────────────

    /// Check a book out to the given member, registering the member on
    /// first use. The availability flip, the ledger entry and the
    /// member's borrowed view change together or not at all.
    pub fn check_out(
        &mut self,
        isbn: &Isbn,
        name: &str,
        library_id: &LibraryId,
    ) -> Result<CheckoutReceipt> {
        let book = match self.books.find_mut(isbn) {
            Some(book) => book,
            None => return Err(LibrisError::BookNotFound(isbn.to_string())),
        };
        if !book.borrow() {
            return Err(LibrisError::BookUnavailable(isbn.to_string()));
        }
        let title = book.title.clone();
        let author = book.author.clone();

        let user = self.users.add_or_get(name, library_id.clone());
        let new_user = user.was_created();
        let user_name = user.record().name.clone();

        self.ledger.add(library_id, Loan::new(isbn.clone()));

        Ok(CheckoutReceipt {
            title,
            author,
            isbn: isbn.clone(),
            user_name,
            library_id: library_id.clone(),
            new_user,
        })
    }

    /// Check a book back in. Fails before any state changes; on success
    /// the ledger entry is removed and the book is available again.
    pub fn check_in(&mut self, library_id: &LibraryId, isbn: &Isbn) -> Result<ReturnReceipt> {
        let user_name = match self.users.find(library_id) {
            Some(user) => user.name.clone(),
            None => return Err(LibrisError::UserNotFound(library_id.to_string())),
        };

        if !self.ledger.has_loans(library_id) {
            return Err(not_on_loan(library_id, isbn, NotOnLoanReason::NoActiveLoans));
        }
        if !self.ledger.contains(library_id, isbn) {
            return Err(not_on_loan(library_id, isbn, NotOnLoanReason::IsbnNotBorrowed));
        }

        let book = match self.books.find_mut(isbn) {
            Some(book) => book,
            None => return Err(LibrisError::BookNotFound(isbn.to_string())),
        };
        book.return_book();
        let title = book.title.clone();

        self.ledger.remove(library_id, isbn);

        Ok(ReturnReceipt {
            title,
            isbn: isbn.clone(),
            user_name,
            library_id: library_id.clone(),
        })
    }

    // ─── Lookups & projections ─────────────────────────────

    pub fn find_book(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.find(isbn)
    }

    pub fn find_author(&self, name: &str) -> Option<&Author> {
        self.authors.find(name)
    }

    pub fn find_genre(&self, kind: GenreKind) -> Option<&Genre> {
        self.genres.find(kind)
    }

    pub fn find_user(&self, library_id: &LibraryId) -> Option<&User> {
        self.users.find(library_id)
    }

    pub fn search_by_title(&self, query: &str) -> Vec<&Book> {
        self.books.search_by_title(query)
    }

    pub fn search_by_author(&self, query: &str) -> Vec<&Book> {
        self.books.search_by_author(query)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter()
    }

    pub fn genres(&self) -> impl Iterator<Item = &Genre> {
        self.genres.iter()
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// The member's borrowed books, projected from the loan ledger.
    pub fn borrowed_by(&self, library_id: &LibraryId) -> Vec<&Book> {
        self.ledger
            .loans_for(library_id)
            .iter()
            .filter_map(|loan| self.books.find(&loan.isbn))
            .collect()
    }

    /// Active loans grouped by member, skipping anyone with nothing out.
    pub fn active_loans(&self) -> Vec<(&User, Vec<&Book>)> {
        self.ledger
            .iter()
            .filter_map(|(library_id, loans)| {
                let user = self.users.find(library_id)?;
                let books = loans
                    .iter()
                    .filter_map(|loan| self.books.find(&loan.isbn))
                    .collect();
                Some((user, books))
            })
            .collect()
    }

    pub fn ledger(&self) -> &LoanLedger {
        &self.ledger
    }
}

fn not_on_loan(library_id: &LibraryId, isbn: &Isbn, reason: NotOnLoanReason) -> LibrisError {
    LibrisError::NotOnLoan {
        library_id: library_id.to_string(),
        isbn: isbn.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).unwrap()
    }

    fn id(raw: &str) -> LibraryId {
        LibraryId::parse(raw).unwrap()
    }

    fn dune_draft() -> BookDraft {
        BookDraft {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            biography: "American science fiction writer.".to_string(),
            isbn: isbn("978-92-95055-02-5"),
            genre: GenreKind::Fiction,
            genre_description: "Invented stories.".to_string(),
            category: "Scifi".to_string(),
        }
    }

    fn library_with_dune() -> Library {
        let mut library = Library::new();
        library.add_book(dune_draft());
        library
    }

    /// available == false must hold exactly for books present in the
    /// ledger, and each such book must show up in the holder's borrowed
    /// projection.
    fn assert_consistent(library: &Library) {
        for book in library.books() {
            let holders: Vec<&LibraryId> = library
                .ledger()
                .iter()
                .filter(|(_, loans)| loans.iter().any(|loan| loan.isbn == book.isbn))
                .map(|(library_id, _)| library_id)
                .collect();
            if book.available {
                assert!(holders.is_empty(), "{} is available but on loan", book.isbn);
            } else {
                assert_eq!(holders.len(), 1, "{} must have exactly one holder", book.isbn);
                let borrowed = library.borrowed_by(holders[0]);
                assert!(borrowed.iter().any(|b| b.isbn == book.isbn));
            }
        }
    }

    #[test]
    fn add_book_creates_author_and_files_genre() {
        let library = library_with_dune();

        let book = library.find_book(&isbn("978-92-95055-02-5")).unwrap();
        assert_eq!(book.title, "Dune");
        assert!(book.available);

        let author = library.find_author("Frank Herbert").unwrap();
        assert_eq!(author.biography, "American science fiction writer.");

        let genre = library.find_genre(GenreKind::Fiction).unwrap();
        let (category, filed) = genre.categories().next().unwrap();
        assert_eq!(category, "Scifi");
        assert_eq!(filed, [isbn("978-92-95055-02-5")]);
    }

    #[test]
    fn add_book_reports_new_records_once() {
        let mut library = Library::new();
        match library.add_book(dune_draft()) {
            AddBookOutcome::Added { new_author, new_genre, .. } => {
                assert!(new_author);
                assert!(new_genre);
            }
            other => panic!("expected Added, got {other:?}"),
        }

        let mut second = dune_draft();
        second.title = "Dune Messiah".to_string();
        second.isbn = isbn("978-01-23456-78-9");
        match library.add_book(second) {
            AddBookOutcome::Added { new_author, new_genre, .. } => {
                assert!(!new_author);
                assert!(!new_genre);
            }
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_isbn_leaves_registries_untouched() {
        let mut library = library_with_dune();

        let mut dup = dune_draft();
        dup.title = "Impostor".to_string();
        dup.author = "Someone Else".to_string();
        match library.add_book(dup) {
            AddBookOutcome::Duplicate { title, .. } => assert_eq!(title, "Dune"),
            other => panic!("expected Duplicate, got {other:?}"),
        }

        assert_eq!(library.books().count(), 1);
        assert!(library.find_author("Someone Else").is_none());
        assert_eq!(library.find_book(&isbn("978-92-95055-02-5")).unwrap().title, "Dune");
    }

    #[test]
    fn checkout_updates_ledger_and_availability() {
        let mut library = library_with_dune();

        let receipt = library
            .check_out(&isbn("978-92-95055-02-5"), "Paul Atreides", &id("AB12345"))
            .unwrap();
        assert!(receipt.new_user);
        assert_eq!(receipt.title, "Dune");
        assert_eq!(receipt.user_name, "Paul Atreides");

        let book = library.find_book(&isbn("978-92-95055-02-5")).unwrap();
        assert!(!book.available);
        assert!(library.ledger().contains(&id("AB12345"), &isbn("978-92-95055-02-5")));

        let borrowed = library.borrowed_by(&id("AB12345"));
        assert_eq!(borrowed.len(), 1);
        assert_eq!(borrowed[0].title, "Dune");

        assert_consistent(&library);
    }

    #[test]
    fn checkout_unknown_isbn_mutates_nothing() {
        let mut library = library_with_dune();

        let err = library.check_out(&isbn("978-11-11111-11-1"), "Paul Atreides", &id("AB12345"));
        assert!(matches!(err, Err(LibrisError::BookNotFound(_))));

        assert_eq!(library.users().count(), 0);
        assert!(library.ledger().is_empty());
        assert!(library.find_book(&isbn("978-92-95055-02-5")).unwrap().available);
        assert_consistent(&library);
    }

    #[test]
    fn checkout_unavailable_book_fails_cleanly() {
        let mut library = library_with_dune();
        library
            .check_out(&isbn("978-92-95055-02-5"), "Paul Atreides", &id("AB12345"))
            .unwrap();

        let err = library.check_out(&isbn("978-92-95055-02-5"), "Feyd Rautha", &id("CD67890"));
        assert!(matches!(err, Err(LibrisError::BookUnavailable(_))));

        // the failed attempt registers no second user and no second loan
        assert_eq!(library.users().count(), 1);
        assert_eq!(library.ledger().active_count(), 1);
        assert!(library.borrowed_by(&id("CD67890")).is_empty());
        assert_consistent(&library);
    }

    #[test]
    fn checkin_restores_preloan_state() {
        let mut library = library_with_dune();
        library
            .check_out(&isbn("978-92-95055-02-5"), "Paul Atreides", &id("AB12345"))
            .unwrap();

        let receipt = library.check_in(&id("AB12345"), &isbn("978-92-95055-02-5")).unwrap();
        assert_eq!(receipt.title, "Dune");
        assert_eq!(receipt.user_name, "Paul Atreides");

        let book = library.find_book(&isbn("978-92-95055-02-5")).unwrap();
        assert!(book.available);
        assert!(library.ledger().is_empty());
        assert!(library.borrowed_by(&id("AB12345")).is_empty());
        assert!(library.active_loans().is_empty());
        assert_consistent(&library);

        // catalog membership is unaffected by loan status
        assert_eq!(library.search_by_title("dune").len(), 1);
    }

    #[test]
    fn checkin_then_checkout_again() {
        let mut library = library_with_dune();
        library
            .check_out(&isbn("978-92-95055-02-5"), "Paul Atreides", &id("AB12345"))
            .unwrap();
        library.check_in(&id("AB12345"), &isbn("978-92-95055-02-5")).unwrap();

        let receipt = library
            .check_out(&isbn("978-92-95055-02-5"), "Chani Kynes", &id("CD67890"))
            .unwrap();
        assert!(receipt.new_user);

        assert!(!library.find_book(&isbn("978-92-95055-02-5")).unwrap().available);
        assert!(library.ledger().contains(&id("CD67890"), &isbn("978-92-95055-02-5")));
        assert!(!library.ledger().contains(&id("AB12345"), &isbn("978-92-95055-02-5")));
        assert_eq!(library.ledger().active_count(), 1);
        assert_consistent(&library);
    }

    #[test]
    fn checkin_unknown_user() {
        let mut library = library_with_dune();
        let err = library.check_in(&id("ZZ99999"), &isbn("978-92-95055-02-5"));
        assert!(matches!(err, Err(LibrisError::UserNotFound(_))));
    }

    #[test]
    fn checkin_reasons_are_distinct() {
        let mut library = library_with_dune();
        let mut second = dune_draft();
        second.title = "Dune Messiah".to_string();
        second.isbn = isbn("978-01-23456-78-9");
        library.add_book(second);

        // user exists but holds nothing
        library.add_user("Paul Atreides", id("AB12345"));
        match library.check_in(&id("AB12345"), &isbn("978-92-95055-02-5")) {
            Err(LibrisError::NotOnLoan { reason, .. }) => {
                assert_eq!(reason, NotOnLoanReason::NoActiveLoans)
            }
            other => panic!("expected NotOnLoan, got {other:?}"),
        }

        // user holds a different book
        library
            .check_out(&isbn("978-01-23456-78-9"), "Paul Atreides", &id("AB12345"))
            .unwrap();
        match library.check_in(&id("AB12345"), &isbn("978-92-95055-02-5")) {
            Err(LibrisError::NotOnLoan { reason, .. }) => {
                assert_eq!(reason, NotOnLoanReason::IsbnNotBorrowed)
            }
            other => panic!("expected NotOnLoan, got {other:?}"),
        }

        // the failed check-ins changed nothing
        assert_eq!(library.ledger().active_count(), 1);
        assert_consistent(&library);
    }

    #[test]
    fn author_dedup_keeps_count_and_biography() {
        let mut library = Library::new();
        library.add_author("Frank Herbert", "First biography.");
        let again = library.add_author("Frank Herbert", "Second biography.");
        assert!(!again.was_created());
        assert_eq!(again.record().biography, "First biography.");
        assert_eq!(library.authors().count(), 1);
    }

    #[test]
    fn active_loans_skips_users_with_nothing_out() {
        let mut library = library_with_dune();
        let mut second = dune_draft();
        second.title = "Dune Messiah".to_string();
        second.isbn = isbn("978-01-23456-78-9");
        library.add_book(second);

        library
            .check_out(&isbn("978-92-95055-02-5"), "Paul Atreides", &id("AB12345"))
            .unwrap();
        library
            .check_out(&isbn("978-01-23456-78-9"), "Chani Kynes", &id("CD67890"))
            .unwrap();
        library.check_in(&id("AB12345"), &isbn("978-92-95055-02-5")).unwrap();

        let loans = library.active_loans();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].0.name, "Chani Kynes");
        assert_eq!(loans[0].1[0].title, "Dune Messiah");
    }

    #[test]
    fn search_is_case_insensitive() {
        let library = library_with_dune();
        assert_eq!(library.search_by_title("dune").len(), 1);
        assert_eq!(library.search_by_title("DUNE").len(), 1);
        assert_eq!(library.search_by_author("herbert").len(), 1);
        assert!(library.search_by_title("messiah").is_empty());
    }

    #[test]
    fn empty_library_projections() {
        let library = Library::new();
        assert!(library.search_by_title("anything").is_empty());
        assert!(library.active_loans().is_empty());
        assert!(library.borrowed_by(&id("AB12345")).is_empty());
        assert_eq!(library.books().count(), 0);
        assert_eq!(library.users().count(), 0);
    }
}
