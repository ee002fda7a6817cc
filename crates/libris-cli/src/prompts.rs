//! Prompt helpers for the console session. Each helper prints its prompt,
//! reads one line and normalizes it; the format-checked variants keep
//! re-prompting until the input parses. `None` always means end of input.

use std::io::{self, BufRead, Write};

use libris_core::{GenreKind, Isbn, LibraryId, capitalize, title_case, truncate_chars};

/// Print a prompt and read one trimmed line.
pub fn line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    writeln!(output, "\n{prompt}")?;
    output.flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

/// A name or title: read one line and title-case it.
pub fn text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    Ok(line(input, output, prompt)?.map(|raw| title_case(&raw)))
}

/// Free text (biography, description): capitalized and truncated.
pub fn free_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    max_chars: usize,
) -> io::Result<Option<String>> {
    Ok(line(input, output, prompt)?.map(|raw| truncate_chars(&capitalize(&raw), max_chars)))
}

/// Re-prompt until a well-formed ISBN arrives.
pub fn isbn<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<Isbn>> {
    let mut prompt = prompt.to_string();
    loop {
        let Some(raw) = line(input, output, &prompt)? else {
            return Ok(None);
        };
        match Isbn::parse(&raw) {
            Ok(isbn) => return Ok(Some(isbn)),
            Err(_) => {
                prompt = "Please enter the ISBN in the correct format (example: 978-92-95055-02-5):"
                    .to_string();
            }
        }
    }
}

/// Re-prompt until a well-formed library ID arrives.
pub fn library_id<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<LibraryId>> {
    let mut prompt = prompt.to_string();
    loop {
        let Some(raw) = line(input, output, &prompt)? else {
            return Ok(None);
        };
        match LibraryId::parse(&raw) {
            Ok(id) => return Ok(Some(id)),
            Err(_) => {
                prompt =
                    "Please enter your library ID in the correct format (example: AZ12345):"
                        .to_string();
            }
        }
    }
}

/// Re-prompt until Fiction or Nonfiction arrives.
pub fn genre_kind<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<GenreKind>> {
    let mut prompt = prompt.to_string();
    loop {
        let Some(raw) = line(input, output, &prompt)? else {
            return Ok(None);
        };
        match raw.parse::<GenreKind>() {
            Ok(kind) => return Ok(Some(kind)),
            Err(_) => {
                writeln!(output, "Invalid genre type. Please specify 'Fiction' or 'Nonfiction'.")?;
                prompt = "Please enter the type of genre (Fiction or Nonfiction):".to_string();
            }
        }
    }
}
