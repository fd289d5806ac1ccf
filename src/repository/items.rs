//! Items repository for database operations.
//!
//! Single source of truth for catalog items: every read and write of the
//! `items` table goes through here.

use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::item::{Item, ItemKind, ItemRow},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Sqlite>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Upsert by identity: every column of an existing row is replaced.
    pub async fn save(&self, item: &Item) -> AppResult<()> {
        let (author, genre, issue_number) = match &item.kind {
            ItemKind::Book { author, genre } => (Some(author.as_str()), Some(genre.as_str()), None),
            ItemKind::Magazine { issue_number } => (None, None, Some(*issue_number)),
        };

        sqlx::query(
            r#"
            INSERT INTO items (uuid, kind, title, year, author, genre, issue_number, available, loaned_to)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (uuid) DO UPDATE SET
                kind = excluded.kind,
                title = excluded.title,
                year = excluded.year,
                author = excluded.author,
                genre = excluded.genre,
                issue_number = excluded.issue_number,
                available = excluded.available,
                loaned_to = excluded.loaned_to
            "#,
        )
        .bind(item.uuid.to_string())
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(item.year)
        .bind(author)
        .bind(genre)
        .bind(issue_number)
        .bind(item.available)
        .bind(&item.loaned_to)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Unordered snapshot of the whole catalog.
    pub async fn get_all(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>("SELECT * FROM items")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    /// Lookup by primary key.
    pub async fn get_by_uuid(&self, uuid: Uuid) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>("SELECT * FROM items WHERE uuid = ?")
            .bind(uuid.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Item::try_from).transpose()
    }

    /// Remove a row if present; absent identities are a no-op.
    pub async fn delete(&self, uuid: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM items WHERE uuid = ?")
            .bind(uuid.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Items currently loaned to the given username.
    pub async fn get_loans_for(&self, username: &str) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>("SELECT * FROM items WHERE loaned_to = ?")
            .bind(username)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // Custody flips below are single conditional updates: the state check
    // and the write are one statement, so two concurrent callers cannot
    // both observe the old state and both succeed.

    /// Mark loaned only if still available. Returns whether a row changed.
    pub async fn mark_loaned(&self, uuid: Uuid, borrower: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET available = 0, loaned_to = ? WHERE uuid = ? AND available = 1",
        )
        .bind(borrower)
        .bind(uuid.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear the borrower regardless of who holds the item.
    pub async fn mark_returned(&self, uuid: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET available = 1, loaned_to = NULL WHERE uuid = ? AND available = 0",
        )
        .bind(uuid.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear the borrower only if the item is currently held by `borrower`.
    pub async fn mark_returned_by(&self, uuid: Uuid, borrower: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET available = 1, loaned_to = NULL \
             WHERE uuid = ? AND available = 0 AND loaned_to = ?",
        )
        .bind(uuid.to_string())
        .bind(borrower)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
