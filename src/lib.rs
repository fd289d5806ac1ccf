//! Bibliotek - single-operator library catalog core.
//!
//! Persisted catalog items, users and librarians with borrow/return
//! semantics, plus bulk import/export of catalog snapshots in a binary
//! and a delimited-text form. Presentation (menus, prompts, tables) is
//! the caller's business; this crate exposes the plain operations
//! behind it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Install the global tracing subscriber, honoring `RUST_LOG` with a
/// fallback built from the logging config. Call once from the process
/// entry point.
pub fn init_tracing(config: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bibliotek={}", config.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
