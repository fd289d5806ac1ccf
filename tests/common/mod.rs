//! Shared test setup: services over a fresh in-memory database.

use bibliotek::{config::DatabaseConfig, db, repository::Repository, services::Services};

pub async fn setup() -> Services {
    // A single connection keeps every query on the same in-memory database.
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    let pool = db::connect(&config).await.expect("Failed to open in-memory database");
    Services::new(Repository::new(pool))
        .await
        .expect("Failed to create services")
}
