//! The console session: a numbered-menu prompt/response loop over any
//! `BufRead`/`Write` pair, so the terminal, script files and tests all
//! drive the same code path.

use std::io::{self, BufRead, Write};

use libris_core::{
    AddBookOutcome, AppConfig, BookDraft, GenreKind, Library, LibrisError, MAX_BIOGRAPHY_CHARS,
    MAX_DESCRIPTION_CHARS, NotOnLoanReason, title_case,
};

use crate::prompts;
use crate::render;

pub struct Session<R, W> {
    config: AppConfig,
    library: Library,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: AppConfig, input: R, output: W) -> Self {
        Self {
            config,
            library: Library::new(),
            input,
            output,
        }
    }

    /// The catalog driven by this session, for inspection after a run.
    pub fn library(&self) -> &Library {
        &self.library
    }

    // ─── Main loop ─────────────────────────────────────────

    pub fn run(&mut self) -> io::Result<()> {
        if self.config.session.banner {
            writeln!(self.output, "\nWelcome to {}!", self.config.library.name)?;
        }
        self.print_menu()?;
        loop {
            let Some(choice) = prompts::line(
                &mut self.input,
                &mut self.output,
                "Select an option (1-16, m for menu, q to quit):",
            )?
            else {
                break;
            };
            match choice.as_str() {
                "q" | "Q" => {
                    writeln!(self.output, "\nGoodbye!")?;
                    break;
                }
                "m" | "M" => self.print_menu()?,
                other => {
                    if !self.dispatch(other)? {
                        break;
                    }
                    if self.config.session.menu_after_action {
                        self.print_menu()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "\n{}\n\
             \x20 1. Add a book            9. Add a user\n\
             \x20 2. Check out a book     10. List all users\n\
             \x20 3. Check in a book      11. View user info\n\
             \x20 4. Search by title      12. Add an author\n\
             \x20 5. Search by author     13. View author details\n\
             \x20 6. Search by ISBN       14. List all authors\n\
             \x20 7. List all books       15. Add a genre\n\
             \x20 8. List loaned books    16. View genres\n\
             \x20 q. Quit",
            self.config.library.name
        )
    }

    /// Returns false when the input ran dry mid-flow.
    fn dispatch(&mut self, choice: &str) -> io::Result<bool> {
        match choice {
            "1" => self.add_book_flow(),
            "2" => self.check_out_flow(),
            "3" => self.check_in_flow(),
            "4" => self.search_title_flow(),
            "5" => self.search_author_flow(),
            "6" => self.search_isbn_flow(),
            "7" => {
                self.list_books()?;
                Ok(true)
            }
            "8" => {
                self.list_loans()?;
                Ok(true)
            }
            "9" => self.add_user_flow(),
            "10" => {
                self.list_users()?;
                Ok(true)
            }
            "11" => self.view_user_flow(),
            "12" => self.add_author_flow(),
            "13" => self.view_author_flow(),
            "14" => {
                self.list_authors()?;
                Ok(true)
            }
            "15" => self.add_genre_flow(),
            "16" => {
                self.genre_overview()?;
                Ok(true)
            }
            "" => Ok(true),
            other => {
                writeln!(
                    self.output,
                    "\nInvalid choice: '{other}'. Enter a number from the menu, m for the menu, or q to quit."
                )?;
                Ok(true)
            }
        }
    }

    // ─── Cataloging ────────────────────────────────────────

    fn add_book_flow(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the following information to add a book:")?;
        let Some(title) = prompts::text(&mut self.input, &mut self.output, "Book title:")? else {
            return Ok(false);
        };
        let Some(author) = prompts::text(&mut self.input, &mut self.output, "Book author:")? else {
            return Ok(false);
        };

        let biography = if self.library.find_author(&author).is_none() {
            writeln!(self.output, "\nThis author has not been found in the library.")?;
            match prompts::free_text(
                &mut self.input,
                &mut self.output,
                "Author's biography (no more than 300 characters):",
                MAX_BIOGRAPHY_CHARS,
            )? {
                Some(biography) => biography,
                None => return Ok(false),
            }
        } else {
            String::new()
        };

        let Some(isbn) = prompts::isbn(
            &mut self.input,
            &mut self.output,
            "Book ISBN (13 digits: example: 978-92-95055-02-5):",
        )?
        else {
            return Ok(false);
        };
        if self.library.find_book(&isbn).is_some() {
            writeln!(self.output, "\nThis book is already in the library!")?;
            return Ok(true);
        }

        let Some(genre) = prompts::genre_kind(
            &mut self.input,
            &mut self.output,
            "Please enter the type of genre (Fiction or Nonfiction):",
        )?
        else {
            return Ok(false);
        };

        let genre_description = if self.library.find_genre(genre).is_none() {
            match prompts::free_text(
                &mut self.input,
                &mut self.output,
                "Genre description (no more than 200 characters):",
                MAX_DESCRIPTION_CHARS,
            )? {
                Some(description) => description,
                None => return Ok(false),
            }
        } else {
            String::new()
        };

        let category_prompt = match genre {
            GenreKind::Fiction => "Fiction Genre category:",
            GenreKind::Nonfiction => "NonFiction Genre subject:",
        };
        let Some(category) = prompts::text(&mut self.input, &mut self.output, category_prompt)?
        else {
            return Ok(false);
        };

        let outcome = self.library.add_book(BookDraft {
            title,
            author,
            biography,
            isbn,
            genre,
            genre_description,
            category,
        });
        match outcome {
            AddBookOutcome::Added { title, author, new_author, new_genre, .. } => {
                if new_author {
                    writeln!(
                        self.output,
                        "\n{author} has been added to the list of authors in the library."
                    )?;
                }
                if new_genre {
                    writeln!(
                        self.output,
                        "\nGenre '{genre}' has been added to the list of genres in the library."
                    )?;
                }
                writeln!(
                    self.output,
                    "\nThe book \"{title}\" by {author} has been added to the library."
                )?;
            }
            AddBookOutcome::Duplicate { .. } => {
                writeln!(self.output, "\nThis book is already in the library!")?;
            }
        }
        Ok(true)
    }

    fn add_author_flow(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the following information to add a new author:")?;
        let Some(name) = prompts::text(&mut self.input, &mut self.output, "Author's full name:")?
        else {
            return Ok(false);
        };
        let Some(biography) = prompts::free_text(
            &mut self.input,
            &mut self.output,
            "Author's biography (no more than 300 characters):",
            MAX_BIOGRAPHY_CHARS,
        )?
        else {
            return Ok(false);
        };

        if self.library.add_author(&name, &biography).was_created() {
            writeln!(
                self.output,
                "\n{name} has been added to the list of authors in the library."
            )?;
        } else {
            writeln!(self.output, "\n{name} already exists in the library")?;
        }
        Ok(true)
    }

    fn add_genre_flow(&mut self) -> io::Result<bool> {
        let Some(kind) = prompts::genre_kind(
            &mut self.input,
            &mut self.output,
            "Please enter the type of genre you want to add (Fiction or Nonfiction):",
        )?
        else {
            return Ok(false);
        };

        if self.library.find_genre(kind).is_some() {
            // existing record: extend its category map instead
            let category_prompt = match kind {
                GenreKind::Fiction => "Fiction Genre category:",
                GenreKind::Nonfiction => "NonFiction Genre subject:",
            };
            let Some(category) =
                prompts::text(&mut self.input, &mut self.output, category_prompt)?
            else {
                return Ok(false);
            };
            if let Err(err) = self.library.add_category(kind, &category) {
                writeln!(self.output, "\n{err}")?;
            } else {
                writeln!(
                    self.output,
                    "\nCategory '{category}' has been added to the {kind} genre."
                )?;
            }
        } else {
            let Some(description) = prompts::free_text(
                &mut self.input,
                &mut self.output,
                "Genre description (no more than 200 characters):",
                MAX_DESCRIPTION_CHARS,
            )?
            else {
                return Ok(false);
            };
            self.library.add_genre(kind, &description);
            writeln!(
                self.output,
                "\nGenre '{kind}' has been added to the list of genres in the library."
            )?;
        }
        Ok(true)
    }

    fn add_user_flow(&mut self) -> io::Result<bool> {
        let Some(name) =
            prompts::text(&mut self.input, &mut self.output, "What is your full name?")?
        else {
            return Ok(false);
        };
        let Some(library_id) = prompts::library_id(
            &mut self.input,
            &mut self.output,
            "Your library id (example: AA12345):",
        )?
        else {
            return Ok(false);
        };

        let added = self.library.add_user(&name, library_id);
        let user = added.record();
        if added.was_created() {
            writeln!(
                self.output,
                "\n{} has been added as a new user to the library.",
                render::user_line(user)
            )?;
        } else {
            writeln!(self.output, "\nUser with the same library ID already exists!")?;
        }
        Ok(true)
    }

    // ─── Circulation ───────────────────────────────────────

    fn check_out_flow(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the following information:")?;
        let Some(isbn) = prompts::isbn(
            &mut self.input,
            &mut self.output,
            "Book ISBN (13 digits: example: 978-92-95055-02-5):",
        )?
        else {
            return Ok(false);
        };
        if self.library.find_book(&isbn).is_none() {
            writeln!(
                self.output,
                "\nThere is no book with ISBN '{isbn}' in the library!"
            )?;
            return Ok(true);
        }

        let Some(name) =
            prompts::text(&mut self.input, &mut self.output, "What is your full name?")?
        else {
            return Ok(false);
        };
        let Some(library_id) = prompts::library_id(
            &mut self.input,
            &mut self.output,
            "Your library id (example: AA12345):",
        )?
        else {
            return Ok(false);
        };

        match self.library.check_out(&isbn, &name, &library_id) {
            Ok(receipt) => {
                if receipt.new_user {
                    writeln!(
                        self.output,
                        "\n{} (Library ID: {}) has been added as a new user to the library.",
                        receipt.user_name, receipt.library_id
                    )?;
                } else {
                    writeln!(self.output, "\nUser with the same library ID already exists!")?;
                }
                writeln!(
                    self.output,
                    "\nThe book \"{}\" by {}, ISBN: {}, has been loaned to {}, library ID {}",
                    receipt.title, receipt.author, receipt.isbn, receipt.user_name, receipt.library_id
                )?;
            }
            Err(LibrisError::BookUnavailable(_)) => {
                writeln!(self.output, "\nThe book is unavailable!")?;
            }
            Err(err) => writeln!(self.output, "\n{err}")?,
        }
        Ok(true)
    }

    fn check_in_flow(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the following information to return a book:")?;
        let Some(library_id) = prompts::library_id(
            &mut self.input,
            &mut self.output,
            "Your library ID (example: AZ12345):",
        )?
        else {
            return Ok(false);
        };
        let Some(isbn) = prompts::isbn(
            &mut self.input,
            &mut self.output,
            "Book ISBN (example: 978-92-95055-02-5):",
        )?
        else {
            return Ok(false);
        };

        match self.library.check_in(&library_id, &isbn) {
            Ok(receipt) => {
                writeln!(
                    self.output,
                    "\nThe book '{}', ISBN: {} has been returned by {}, (Library ID: {})",
                    receipt.title, receipt.isbn, receipt.user_name, receipt.library_id
                )?;
            }
            Err(LibrisError::UserNotFound(_)) => {
                writeln!(
                    self.output,
                    "\nNo user with Library ID: {library_id} has been found in the library!"
                )?;
            }
            Err(LibrisError::NotOnLoan { reason, .. }) => {
                let name = self
                    .library
                    .find_user(&library_id)
                    .map(|user| user.name.clone())
                    .unwrap_or_default();
                match reason {
                    NotOnLoanReason::NoActiveLoans => writeln!(
                        self.output,
                        "\nNo record found for the book with ISBN {isbn} borrowed by {name}, (Library ID: {library_id})"
                    )?,
                    NotOnLoanReason::IsbnNotBorrowed => writeln!(
                        self.output,
                        "\nThe book with ISBN {isbn} has not been borrowed by {name} (Library ID: {library_id})"
                    )?,
                }
            }
            Err(err) => writeln!(self.output, "\n{err}")?,
        }
        Ok(true)
    }

    // ─── Search ────────────────────────────────────────────

    fn search_title_flow(&mut self) -> io::Result<bool> {
        let Some(query) =
            prompts::line(&mut self.input, &mut self.output, "Enter the book title:")?
        else {
            return Ok(false);
        };
        let results = self.library.search_by_title(&query);
        if results.is_empty() {
            writeln!(
                self.output,
                "\nNo book titled '{}' has been found in the library!",
                title_case(&query)
            )?;
        } else {
            render::search_results(&mut self.output, &results)?;
        }
        Ok(true)
    }

    fn search_author_flow(&mut self) -> io::Result<bool> {
        let Some(query) =
            prompts::line(&mut self.input, &mut self.output, "Enter the book author:")?
        else {
            return Ok(false);
        };
        let results = self.library.search_by_author(&query);
        if results.is_empty() {
            writeln!(
                self.output,
                "\nNo '{}' has been found in the library!",
                title_case(&query)
            )?;
        } else {
            render::search_results(&mut self.output, &results)?;
        }
        Ok(true)
    }

    fn search_isbn_flow(&mut self) -> io::Result<bool> {
        let Some(isbn) = prompts::isbn(
            &mut self.input,
            &mut self.output,
            "Enter the book ISBN (13 digits: example: 978-92-95055-02-5):",
        )?
        else {
            return Ok(false);
        };
        match self.library.find_book(&isbn) {
            Some(book) => render::search_results(&mut self.output, &[book])?,
            None => {
                writeln!(self.output, "\nNo ISBN '{isbn}' has been found in our library!")?;
            }
        }
        Ok(true)
    }

    // ─── Listings ──────────────────────────────────────────

    fn list_books(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHere is the list of books in the library:\n")?;
        let mut any = false;
        for book in self.library.books() {
            any = true;
            writeln!(self.output, "{}", render::book_line(book))?;
        }
        if !any {
            writeln!(self.output, "Currently, there are no books in the library!")?;
        }
        Ok(())
    }

    fn list_loans(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHere is the list of loaned books in the library:")?;
        let loans = self.library.active_loans();
        if loans.is_empty() {
            writeln!(self.output, "\nNo books are currently loaned!")?;
            return Ok(());
        }
        for (user, books) in &loans {
            writeln!(self.output, "\nBooks loaned to {}:", render::user_line(user))?;
            for book in books {
                writeln!(self.output, "\n{}", render::book_line(book))?;
            }
        }
        Ok(())
    }

    fn list_users(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHere is the list of current users in the library:")?;
        let mut any = false;
        for user in self.library.users() {
            any = true;
            writeln!(self.output, "\n{}", render::user_line(user))?;
        }
        if !any {
            writeln!(self.output, "\nNo users are found!")?;
        }
        Ok(())
    }

    fn view_user_flow(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the following information:")?;
        let Some(library_id) = prompts::library_id(
            &mut self.input,
            &mut self.output,
            "Library ID (example: AZ12345):",
        )?
        else {
            return Ok(false);
        };
        match self.library.find_user(&library_id) {
            Some(user) => {
                writeln!(self.output, "\n{}", render::user_line(user))?;
                let borrowed = self.library.borrowed_by(&library_id);
                if borrowed.is_empty() {
                    writeln!(self.output, "No borrowed books.")?;
                } else {
                    writeln!(self.output, "Borrowed books:")?;
                    for book in borrowed {
                        writeln!(self.output, "  - {}", render::book_line(book))?;
                    }
                }
            }
            None => {
                writeln!(self.output, "\nNo user was found with Library ID {library_id}.")?;
            }
        }
        Ok(true)
    }

    fn view_author_flow(&mut self) -> io::Result<bool> {
        let Some(name) = prompts::text(
            &mut self.input,
            &mut self.output,
            "Please enter the name of the author you are interested in:",
        )?
        else {
            return Ok(false);
        };
        match self.library.find_author(&name) {
            Some(author) => {
                writeln!(self.output, "\nAuthor: {}", author.name)?;
                writeln!(self.output, "Biography: {}", author.biography)?;
            }
            None => {
                writeln!(
                    self.output,
                    "\n{name} is not in the list of authors in the library!"
                )?;
            }
        }
        Ok(true)
    }

    fn list_authors(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHere is the list of current authors in the library:")?;
        let mut any = false;
        for author in self.library.authors() {
            any = true;
            writeln!(self.output, "\nAuthor: {}", author.name)?;
            writeln!(self.output, "Biography: {}", author.biography)?;
        }
        if !any {
            writeln!(self.output, "\nNo authors have been added to the library yet!")?;
        }
        Ok(())
    }

    fn genre_overview(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHere is the list of all genres in the library:")?;
        let mut any = false;
        for genre in self.library.genres() {
            any = true;
            writeln!(self.output, "\nGenre: {}", genre.kind)?;
            writeln!(self.output, "Description: {}", genre.description)?;
            let mut has_categories = false;
            for (category, filed) in genre.categories() {
                has_categories = true;
                writeln!(self.output, "Category: {category}")?;
                if filed.is_empty() {
                    writeln!(self.output, "  - No books in this category")?;
                }
                for isbn in filed {
                    if let Some(book) = self.library.find_book(isbn) {
                        writeln!(
                            self.output,
                            "  - Title: {}, Author: {}",
                            book.title, book.author
                        )?;
                    }
                }
            }
            if !has_categories {
                writeln!(self.output, "  - No books in this genre")?;
            }
        }
        if !any {
            writeln!(self.output, "\nNo genres have been added to the library yet!")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use libris_core::{Isbn, LibraryId};

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.session.banner = false;
        config.session.menu_after_action = false;
        config
    }

    fn run_script(script: &str) -> (Session<Cursor<String>, Vec<u8>>, String) {
        let mut session = Session::new(quiet_config(), Cursor::new(script.to_string()), Vec::new());
        session.run().unwrap();
        let transcript = String::from_utf8(session.output.clone()).unwrap();
        (session, transcript)
    }

    const ADD_DUNE: &str = "1\ndune\nfrank herbert\nAn American science fiction author.\n\
                            978-92-95055-02-5\nfiction\nInvented stories.\nscifi\n";

    #[test]
    fn add_book_full_flow() {
        let (session, transcript) = run_script(&format!("{ADD_DUNE}q\n"));

        assert!(transcript.contains("This author has not been found in the library."));
        assert!(transcript.contains("Frank Herbert has been added to the list of authors"));
        assert!(transcript.contains("Genre 'Fiction' has been added to the list of genres"));
        assert!(transcript
            .contains("The book \"Dune\" by Frank Herbert has been added to the library."));

        let isbn = Isbn::parse("978-92-95055-02-5").unwrap();
        let book = session.library().find_book(&isbn).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.category, "Scifi");
        assert!(session.library().find_author("Frank Herbert").is_some());
    }

    #[test]
    fn checkout_and_checkin_round_trip() {
        let script = format!(
            "{ADD_DUNE}2\n978-92-95055-02-5\npaul atreides\nab12345\n\
             3\nab12345\n978-92-95055-02-5\nq\n"
        );
        let (session, transcript) = run_script(&script);

        assert!(transcript.contains(
            "Paul Atreides (Library ID: AB12345) has been added as a new user to the library."
        ));
        assert!(transcript.contains(
            "The book \"Dune\" by Frank Herbert, ISBN: 978-92-95055-02-5, has been loaned to Paul Atreides, library ID AB12345"
        ));
        assert!(transcript.contains(
            "The book 'Dune', ISBN: 978-92-95055-02-5 has been returned by Paul Atreides, (Library ID: AB12345)"
        ));

        let isbn = Isbn::parse("978-92-95055-02-5").unwrap();
        assert!(session.library().find_book(&isbn).unwrap().available);
        assert!(session.library().ledger().is_empty());
    }

    #[test]
    fn checkout_unknown_isbn() {
        let (session, transcript) = run_script("2\n978-11-11111-11-1\nq\n");
        assert!(transcript
            .contains("There is no book with ISBN '978-11-11111-11-1' in the library!"));
        assert_eq!(session.library().users().count(), 0);
    }

    #[test]
    fn checkout_unavailable_book() {
        let script = format!(
            "{ADD_DUNE}2\n978-92-95055-02-5\npaul atreides\nab12345\n\
             2\n978-92-95055-02-5\nchani kynes\ncd67890\nq\n"
        );
        let (session, transcript) = run_script(&script);
        assert!(transcript.contains("The book is unavailable!"));
        assert_eq!(session.library().users().count(), 1);
    }

    #[test]
    fn checkin_without_loan_reports_no_record() {
        let script = format!("{ADD_DUNE}9\npaul atreides\nab12345\n3\nab12345\n978-92-95055-02-5\nq\n");
        let (_, transcript) = run_script(&script);
        assert!(transcript.contains(
            "No record found for the book with ISBN 978-92-95055-02-5 borrowed by Paul Atreides"
        ));
    }

    #[test]
    fn invalid_isbn_reprompts() {
        let (_, transcript) = run_script("6\nnot-an-isbn\n978-92-95055-02-5\nq\n");
        assert!(transcript.contains("Please enter the ISBN in the correct format"));
        assert!(transcript.contains("No ISBN '978-92-95055-02-5' has been found in our library!"));
    }

    #[test]
    fn search_title_case_insensitive() {
        let script = format!("{ADD_DUNE}4\nDUNE\nq\n");
        let (_, transcript) = run_script(&script);
        assert!(transcript.contains("This is what we have found in the library:"));
        assert!(transcript.contains("Dune by Frank Herbert, ISBN: 978-92-95055-02-5"));
    }

    #[test]
    fn empty_listings_have_messages() {
        let (_, transcript) = run_script("7\n8\n10\n14\n16\nq\n");
        assert!(transcript.contains("Currently, there are no books in the library!"));
        assert!(transcript.contains("No books are currently loaned!"));
        assert!(transcript.contains("No users are found!"));
        assert!(transcript.contains("No authors have been added to the library yet!"));
        assert!(transcript.contains("No genres have been added to the library yet!"));
    }

    #[test]
    fn quit_immediately() {
        let (_, transcript) = run_script("q\n");
        assert!(transcript.contains("Goodbye!"));
    }

    #[test]
    fn eof_ends_session_cleanly() {
        let (_, transcript) = run_script("");
        assert!(transcript.contains("1. Add a book"));
    }

    #[test]
    fn duplicate_isbn_aborts_add() {
        let script = format!("{ADD_DUNE}1\ndune messiah\nfrank herbert\n978-92-95055-02-5\nq\n");
        let (session, transcript) = run_script(&script);
        assert!(transcript.contains("This book is already in the library!"));
        assert_eq!(session.library().books().count(), 1);
    }

    #[test]
    fn view_user_shows_borrowed_projection() {
        let script = format!(
            "{ADD_DUNE}2\n978-92-95055-02-5\npaul atreides\nab12345\n11\nab12345\nq\n"
        );
        let (session, transcript) = run_script(&script);
        assert!(transcript.contains("Paul Atreides (Library ID: AB12345)"));
        assert!(transcript.contains("Borrowed books:"));
        assert!(transcript.contains("  - Dune by Frank Herbert, ISBN: 978-92-95055-02-5"));

        let id = LibraryId::parse("AB12345").unwrap();
        assert_eq!(session.library().borrowed_by(&id).len(), 1);
    }
}
