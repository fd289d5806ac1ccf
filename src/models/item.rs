//! Catalog item model and row mapping.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

/// Variant-specific fields of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Book { author: String, genre: String },
    Magazine { issue_number: i32 },
}

impl ItemKind {
    /// Discriminant stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Book { .. } => "book",
            ItemKind::Magazine { .. } => "magazine",
        }
    }
}

/// A circulating catalog entry. `loaned_to` is set exactly when
/// `available` is false; only the lending service flips either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: Uuid,
    pub title: String,
    pub year: i32,
    pub available: bool,
    pub loaned_to: Option<String>,
    pub kind: ItemKind,
}

impl Item {
    /// New book with a fresh identity, available for lending.
    pub fn new_book(title: &str, author: &str, year: i32, genre: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.to_string(),
            year,
            available: true,
            loaned_to: None,
            kind: ItemKind::Book {
                author: author.to_string(),
                genre: genre.to_string(),
            },
        }
    }

    /// New magazine with a fresh identity, available for lending.
    pub fn new_magazine(title: &str, year: i32, issue_number: i32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.to_string(),
            year,
            available: true,
            loaned_to: None,
            kind: ItemKind::Magazine { issue_number },
        }
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    uuid: String,
    kind: String,
    title: String,
    year: i64,
    author: Option<String>,
    genre: Option<String>,
    issue_number: Option<i64>,
    available: bool,
    loaned_to: Option<String>,
}

impl TryFrom<ItemRow> for Item {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let uuid = row
            .uuid
            .parse::<Uuid>()
            .map_err(|_| AppError::Internal(format!("Malformed uuid in items row: {}", row.uuid)))?;

        let kind = match row.kind.as_str() {
            "book" => ItemKind::Book {
                author: row.author.unwrap_or_default(),
                genre: row.genre.unwrap_or_default(),
            },
            "magazine" => ItemKind::Magazine {
                issue_number: row.issue_number.unwrap_or_default() as i32,
            },
            other => {
                return Err(AppError::Internal(format!(
                    "Unknown item kind in row {}: {}",
                    row.uuid, other
                )))
            }
        };

        Ok(Item {
            uuid,
            title: row.title,
            year: row.year as i32,
            available: row.available,
            loaned_to: row.loaned_to,
            kind,
        })
    }
}
