//! Repository layer for database operations

pub mod items;
pub mod persons;

use sqlx::{Pool, Sqlite};

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub items: items::ItemsRepository,
    pub persons: persons::PersonsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            persons: persons::PersonsRepository::new(pool.clone()),
            pool,
        }
    }
}
