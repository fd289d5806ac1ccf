//! Persons repository for database operations.
//!
//! Users and librarians live in one table partitioned by role; the
//! username primary key keeps a name from holding both roles at once.

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::person::{Person, PersonKind, PersonRow, Role},
};

#[derive(Clone)]
pub struct PersonsRepository {
    pool: Pool<Sqlite>,
}

impl PersonsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Look up a person within one role partition.
    pub async fn find_by_role(&self, username: &str, role: Role) -> AppResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT * FROM persons WHERE username = ? AND role = ?",
        )
        .bind(username)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Person::try_from).transpose()
    }

    /// Check whether a username is taken in either role.
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM persons WHERE username = ?)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new person. The primary key turns a duplicate username
    /// into a typed error, with no check-then-insert window.
    pub async fn create(&self, person: &Person) -> AppResult<()> {
        let salary = match person.kind {
            PersonKind::Librarian { salary } => Some(salary),
            PersonKind::User => None,
        };

        let result = sqlx::query(
            "INSERT INTO persons (username, full_name, password, role, salary) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&person.username)
        .bind(&person.full_name)
        .bind(&person.password)
        .bind(person.kind.role().as_str())
        .bind(salary)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateKey(person.username.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the mutable fields of an existing person. The username and
    /// role never change. Returns whether a row matched.
    pub async fn update(&self, person: &Person) -> AppResult<bool> {
        let salary = match person.kind {
            PersonKind::Librarian { salary } => Some(salary),
            PersonKind::User => None,
        };

        let result = sqlx::query(
            "UPDATE persons SET full_name = ?, password = ?, salary = ? \
             WHERE username = ? AND role = ?",
        )
        .bind(&person.full_name)
        .bind(&person.password)
        .bind(salary)
        .bind(&person.username)
        .bind(person.kind.role().as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Role-scoped delete. Returns whether a row matched.
    pub async fn delete(&self, username: &str, role: Role) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE username = ? AND role = ?")
            .bind(username)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All persons in one role partition.
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>("SELECT * FROM persons WHERE role = ?")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Person::try_from).collect()
    }

    /// Total person count across both roles.
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM persons")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
