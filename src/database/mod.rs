//! SQLite Database Module
//!
//! Structured storage for in-progress booking drafts, submitted bookings,
//! rate tables, and the driver roster.

mod migrations;
mod models;

pub mod bookings;
pub mod drivers;
pub mod rates;

pub use bookings::BookingOps;
pub use drivers::DriverOps;
pub use migrations::run_migrations;
pub use models::*;
pub use rates::RateOps;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database under the given data directory.
    pub async fn new(data_dir: &std::path::Path) -> Result<Self, sqlx::Error> {
        let db_path = data_dir.join("freightdesk.db");

        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", db_path.display()))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            path: db_path,
        };

        migrations::run_migrations(&db.pool).await?;

        Ok(db)
    }

    /// Get the underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
