//! Person model (users and librarians) and row mapping.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Role partition stored in the `role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Librarian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Librarian => "librarian",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "librarian" => Ok(Role::Librarian),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Variant-specific fields of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonKind {
    User,
    Librarian { salary: i32 },
}

impl PersonKind {
    pub fn role(&self) -> Role {
        match self {
            PersonKind::User => Role::User,
            PersonKind::Librarian { .. } => Role::Librarian,
        }
    }
}

/// A library account. The username is the primary key and unique across
/// both roles. The password is an opaque credential, stored as an argon2
/// PHC string; it round-trips through binary snapshots unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub kind: PersonKind,
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    username: String,
    full_name: String,
    password: String,
    role: String,
    salary: Option<i64>,
}

impl TryFrom<PersonRow> for Person {
    type Error = AppError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            AppError::Internal(format!(
                "Unknown role in persons row {}: {}",
                row.username, row.role
            ))
        })?;

        let kind = match role {
            Role::User => PersonKind::User,
            Role::Librarian => PersonKind::Librarian {
                salary: row.salary.unwrap_or_default() as i32,
            },
        };

        Ok(Person {
            username: row.username,
            full_name: row.full_name,
            password: row.password,
            kind,
        })
    }
}
