//! Business logic services

pub mod catalog;
pub mod loans;
pub mod users;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services and run the startup bootstrap: an empty person
    /// table receives the default librarian account.
    pub async fn new(repository: Repository) -> AppResult<Self> {
        let services = Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            users: users::UsersService::new(repository),
        };

        services.users.ensure_default_admin().await?;

        Ok(services)
    }
}
