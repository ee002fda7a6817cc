use std::io::{self, Write};

use libris_core::{Book, User};

/// One catalog line: `Title by Author, ISBN: …`
pub fn book_line(book: &Book) -> String {
    format!("{} by {}, ISBN: {}", book.title, book.author, book.isbn)
}

pub fn user_line(user: &User) -> String {
    format!("{} (Library ID: {})", user.name, user.library_id)
}

pub fn search_results<W: Write>(output: &mut W, results: &[&Book]) -> io::Result<()> {
    writeln!(output, "\nThis is what we have found in the library:\n")?;
    for book in results {
        writeln!(output, "{}", book_line(book))?;
    }
    Ok(())
}
