//! Delimited text (`;`-separated) interchange format.
//!
//! Headers, status labels and the `-` placeholder are the historical
//! Polish wire format and must round-trip byte for byte; they are not UI
//! strings. Fields are split on raw `;` with no quoting, which is why the
//! parser here is hand-rolled rather than a CSV library.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{Item, ItemKind},
        person::Person,
    },
};

/// Header of the book export table.
pub const ITEMS_HEADER: &str = "Typ;UUID;Tytuł;Autor;Rok;Gatunek;Status;Wypożyczający";
/// Header of the person export table (credentials omitted in this form).
pub const USERS_HEADER: &str = "Login;Imię i nazwisko";
/// Header of the loan export table.
pub const LOANS_HEADER: &str = "UUID;Tytuł;Użytkownik";

const AVAILABLE_LABEL: &str = "DOSTĘPNA";
const LOANED_LABEL: &str = "WYPOŻYCZONA";

/// Render one book as an export row. Magazines have no representation in
/// the text form and yield `None`.
pub fn book_row(item: &Item) -> Option<String> {
    let ItemKind::Book { author, genre } = &item.kind else {
        return None;
    };
    let status = if item.available {
        AVAILABLE_LABEL
    } else {
        LOANED_LABEL
    };
    let borrower = item.loaned_to.as_deref().unwrap_or("-");

    Some(format!(
        "Book;{};{};{};{};{};{};{}",
        item.uuid, item.title, author, item.year, genre, status, borrower
    ))
}

/// Parse one data row of the book table.
///
/// Returns `Ok(None)` for well-formed rows whose kind is not `Book`
/// (they are not part of this form). Imported books always start
/// available and unloaned, whatever status the row carried. The year is
/// validated before the kind so a malformed row never slips through as
/// "not a book".
pub fn parse_book_row(line_no: usize, line: &str) -> AppResult<Option<Item>> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 8 {
        return Err(AppError::InvalidFormat(format!(
            "line {}: expected 8 fields, got {}",
            line_no,
            fields.len()
        )));
    }

    let year: i32 = fields[4].trim().parse().map_err(|_| {
        AppError::InvalidFormat(format!("line {}: invalid year '{}'", line_no, fields[4]))
    })?;

    if fields[0] != "Book" {
        return Ok(None);
    }

    let uuid: Uuid = fields[1].parse().map_err(|_| {
        AppError::InvalidFormat(format!("line {}: invalid uuid '{}'", line_no, fields[1]))
    })?;

    Ok(Some(Item {
        uuid,
        title: fields[2].to_string(),
        year,
        available: true,
        loaned_to: None,
        kind: ItemKind::Book {
            author: fields[3].to_string(),
            genre: fields[5].to_string(),
        },
    }))
}

/// Row of the credentials-omitting person export.
pub fn user_row(person: &Person) -> String {
    format!("{};{}", person.username, person.full_name)
}

/// Row of the credentials-including person export (this form carries no
/// header).
pub fn user_row_with_credentials(person: &Person) -> String {
    format!(
        "{};{};{}",
        person.username, person.full_name, person.password
    )
}

/// Parse one person import row into (username, full name, password).
/// The password field is optional; a missing one imports as empty.
pub fn parse_user_row(line_no: usize, line: &str) -> AppResult<(String, String, String)> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 2 {
        return Err(AppError::InvalidFormat(format!(
            "line {}: expected at least 2 fields, got {}",
            line_no,
            fields.len()
        )));
    }

    let password = fields.get(2).copied().unwrap_or("");
    Ok((
        fields[0].to_string(),
        fields[1].to_string(),
        password.to_string(),
    ))
}

/// Row of the loan export. Only loaned items are rendered.
pub fn loan_row(item: &Item) -> Option<String> {
    if item.available {
        return None;
    }
    let borrower = item.loaned_to.as_deref()?;
    Some(format!("{};{};{}", item.uuid, item.title, borrower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_row_round_trip() {
        let book = Item::new_book("Solaris", "Stanisław Lem", 1961, "science fiction");
        let row = book_row(&book).unwrap();
        let parsed = parse_book_row(2, &row).unwrap().unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn test_magazine_has_no_row() {
        let magazine = Item::new_magazine("Przekrój", 2023, 7);
        assert!(book_row(&magazine).is_none());
    }

    #[test]
    fn test_loaned_book_imports_available() {
        let mut book = Item::new_book("Solaris", "Stanisław Lem", 1961, "science fiction");
        book.available = false;
        book.loaned_to = Some("alice".to_string());

        let row = book_row(&book).unwrap();
        assert!(row.contains("WYPOŻYCZONA"));
        assert!(row.ends_with(";alice"));

        let parsed = parse_book_row(2, &row).unwrap().unwrap();
        assert!(parsed.available);
        assert_eq!(parsed.loaned_to, None);
    }

    #[test]
    fn test_short_row_rejected() {
        let err = parse_book_row(3, "Book;only;four;fields").unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[test]
    fn test_bad_year_rejected() {
        let line = "Book;3c9aafd5-9056-4f85-b966-3482d709a5b9;Tytuł;Autor;rok;Gatunek;DOSTĘPNA;-";
        let err = parse_book_row(4, line).unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[test]
    fn test_bad_year_rejected_even_for_non_books() {
        // The year is checked before the kind filter.
        let line = "Magazine;3c9aafd5-9056-4f85-b966-3482d709a5b9;Tytuł;-;rok;-;DOSTĘPNA;-";
        assert!(parse_book_row(4, line).is_err());
    }

    #[test]
    fn test_non_book_row_ignored() {
        let line = "Magazine;3c9aafd5-9056-4f85-b966-3482d709a5b9;Tytuł;-;2020;-;DOSTĘPNA;-";
        assert!(parse_book_row(5, line).unwrap().is_none());
    }

    #[test]
    fn test_bad_uuid_rejected() {
        let line = "Book;not-a-uuid;Tytuł;Autor;1999;Gatunek;DOSTĘPNA;-";
        let err = parse_book_row(6, line).unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[test]
    fn test_user_row_password_optional() {
        let (username, full_name, password) = parse_user_row(2, "jan;Jan Kowalski").unwrap();
        assert_eq!(username, "jan");
        assert_eq!(full_name, "Jan Kowalski");
        assert_eq!(password, "");

        let (_, _, password) = parse_user_row(3, "ola;Ola Nowak;sekret").unwrap();
        assert_eq!(password, "sekret");
    }

    #[test]
    fn test_user_row_too_short() {
        assert!(parse_user_row(2, "tylko-login").is_err());
    }
}
