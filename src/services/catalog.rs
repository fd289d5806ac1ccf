//! Catalog service: item CRUD and bulk reconciliation.
//!
//! Reconciliation merges an external item collection into the store
//! without clobbering existing entries: identities already present are
//! skipped, everything else is saved. There is no transaction around a
//! whole import; records reconciled before a failure stay in the store.

use std::path::Path;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    exchange::{binary, text},
    models::{import_report::ImportReport, item::Item},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the catalog; its identity is generated here.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        year: i32,
        genre: &str,
    ) -> AppResult<Item> {
        let item = Item::new_book(title, author, year, genre);
        self.repository.items.save(&item).await?;
        tracing::info!(item = %item.uuid, title, "book added");
        Ok(item)
    }

    /// Add a new magazine to the catalog.
    pub async fn add_magazine(&self, title: &str, year: i32, issue_number: i32) -> AppResult<Item> {
        let item = Item::new_magazine(title, year, issue_number);
        self.repository.items.save(&item).await?;
        tracing::info!(item = %item.uuid, title, "magazine added");
        Ok(item)
    }

    /// Full catalog snapshot.
    pub async fn list(&self) -> AppResult<Vec<Item>> {
        self.repository.items.get_all().await
    }

    /// Number of stored items.
    pub async fn count(&self) -> AppResult<i64> {
        self.repository.items.count().await
    }

    pub async fn get(&self, uuid: Uuid) -> AppResult<Item> {
        self.repository
            .items
            .get_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", uuid)))
    }

    /// Replace the stored copy of an existing item. Callers read the item,
    /// modify it and hand the whole thing back; custody fields must come
    /// along unchanged (the lending service owns them).
    pub async fn update_item(&self, item: &Item) -> AppResult<()> {
        self.get(item.uuid).await?;
        self.repository.items.save(item).await
    }

    /// Remove an item from the catalog; unknown identities are a no-op.
    pub async fn remove(&self, uuid: Uuid) -> AppResult<()> {
        self.repository.items.delete(uuid).await
    }

    // =========================================================================
    // Bulk import / export
    // =========================================================================

    /// Import a binary catalog snapshot, merging it into the store.
    pub async fn import_items_bin(&self, path: impl AsRef<Path>) -> AppResult<ImportReport> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let items = binary::decode_items(&bytes)?;

        let mut report = ImportReport::default();
        for item in &items {
            self.reconcile_one(item, &mut report).await?;
        }

        tracing::info!(path = %path.as_ref().display(), %report, "binary item import finished");
        Ok(report)
    }

    /// Import items from the delimited text form. A malformed row aborts
    /// the rest of the file; rows reconciled before it stay in the store.
    pub async fn import_items_text(&self, path: impl AsRef<Path>) -> AppResult<ImportReport> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;

        let mut report = ImportReport::default();
        // First line is the header.
        for (idx, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let Some(item) = text::parse_book_row(idx + 1, line)? else {
                continue;
            };
            self.reconcile_one(&item, &mut report).await?;
        }

        tracing::info!(path = %path.as_ref().display(), %report, "text item import finished");
        Ok(report)
    }

    /// Export the full catalog as a binary snapshot. Returns the number of
    /// items written.
    pub async fn export_items_bin(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let items = self.repository.items.get_all().await?;
        let bytes = binary::encode_items(&items)?;
        tokio::fs::write(path.as_ref(), bytes).await?;

        tracing::info!(path = %path.as_ref().display(), count = items.len(), "binary item export finished");
        Ok(items.len())
    }

    /// Export the catalog as delimited text. Only books are representable
    /// in this form; magazines are left out. Returns the number of rows
    /// written.
    pub async fn export_items_text(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let items = self.repository.items.get_all().await?;

        let mut out = String::from(text::ITEMS_HEADER);
        out.push('\n');
        let mut count = 0;
        for item in &items {
            if let Some(row) = text::book_row(item) {
                out.push_str(&row);
                out.push('\n');
                count += 1;
            }
        }
        tokio::fs::write(path.as_ref(), out).await?;

        tracing::info!(path = %path.as_ref().display(), count, "text item export finished");
        Ok(count)
    }

    /// Export every currently-loaned item as delimited text. Returns the
    /// number of rows written.
    pub async fn export_loans_text(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let items = self.repository.items.get_all().await?;

        let mut out = String::from(text::LOANS_HEADER);
        out.push('\n');
        let mut count = 0;
        for item in &items {
            if let Some(row) = text::loan_row(item) {
                out.push_str(&row);
                out.push('\n');
                count += 1;
            }
        }
        tokio::fs::write(path.as_ref(), out).await?;

        tracing::info!(path = %path.as_ref().display(), count, "loan export finished");
        Ok(count)
    }

    /// One reconciliation step: save when the identity is unknown, leave
    /// the stored copy untouched when it is not.
    async fn reconcile_one(&self, item: &Item, report: &mut ImportReport) -> AppResult<()> {
        if self.repository.items.get_by_uuid(item.uuid).await?.is_none() {
            self.repository.items.save(item).await?;
            report.record_added();
        } else {
            report.record_skipped();
        }
        Ok(())
    }
}
