//! Lending service.
//!
//! The only code path that changes item custody. Each transition is a
//! conditional update against the items table, so the legality check and
//! the write cannot be interleaved with another caller's.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow an item for `borrower`. Legal only from the available
    /// state; fails with `AlreadyLoaned` when the item is out.
    pub async fn borrow(&self, uuid: Uuid, borrower: &str) -> AppResult<Item> {
        if self.repository.items.mark_loaned(uuid, borrower).await? {
            tracing::info!(item = %uuid, borrower, "item loaned");
            return self.require(uuid).await;
        }

        // The conditional update matched nothing: unknown item or already out.
        match self.repository.items.get_by_uuid(uuid).await? {
            None => Err(AppError::NotFound(format!("Item {} not found", uuid))),
            Some(_) => Err(AppError::AlreadyLoaned(uuid)),
        }
    }

    /// Take an item back regardless of who holds it (librarian path).
    pub async fn return_any(&self, uuid: Uuid) -> AppResult<Item> {
        if self.repository.items.mark_returned(uuid).await? {
            tracing::info!(item = %uuid, "item returned");
            return self.require(uuid).await;
        }

        match self.repository.items.get_by_uuid(uuid).await? {
            None => Err(AppError::NotFound(format!("Item {} not found", uuid))),
            Some(_) => Err(AppError::NotLoaned(uuid)),
        }
    }

    /// Take an item back only from its current borrower.
    pub async fn return_by_owner(&self, uuid: Uuid, requester: &str) -> AppResult<Item> {
        if self.repository.items.mark_returned_by(uuid, requester).await? {
            tracing::info!(item = %uuid, requester, "item returned by borrower");
            return self.require(uuid).await;
        }

        match self.repository.items.get_by_uuid(uuid).await? {
            None => Err(AppError::NotFound(format!("Item {} not found", uuid))),
            Some(item) if item.available => Err(AppError::NotLoaned(uuid)),
            Some(_) => Err(AppError::NotOwner(uuid)),
        }
    }

    /// Items currently out to the given user.
    pub async fn loans_for(&self, username: &str) -> AppResult<Vec<Item>> {
        self.repository.items.get_loans_for(username).await
    }

    async fn require(&self, uuid: Uuid) -> AppResult<Item> {
        self.repository
            .items
            .get_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", uuid)))
    }
}
