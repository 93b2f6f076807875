//! Database Migrations
//!
//! Handles schema creation and versioned migrations.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{info, warn};

/// Current database schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create migrations table if it doesn't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version = get_current_version(pool).await?;

    info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    if current_version < SCHEMA_VERSION {
        info!(
            "Running database migrations from v{} to v{}",
            current_version, SCHEMA_VERSION
        );

        for version in (current_version + 1)..=SCHEMA_VERSION {
            run_migration(pool, version).await?;
        }

        info!("Database migrations completed successfully");
    }

    Ok(())
}

/// Get the current schema version
async fn get_current_version(pool: &SqlitePool) -> Result<i32, sqlx::Error> {
    let result = sqlx::query("SELECT MAX(version) as version FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(result
        .and_then(|row| row.try_get::<i32, _>("version").ok())
        .unwrap_or(0))
}

/// Run a specific migration version
async fn run_migration(pool: &SqlitePool, version: i32) -> Result<(), sqlx::Error> {
    let (name, sql) = match version {
        1 => ("initial_schema", MIGRATION_V1),
        2 => ("driver_roster", MIGRATION_V2),
        _ => {
            warn!("Unknown migration version: {}", version);
            return Ok(());
        }
    };

    info!("Applying migration v{}: {}", version, name);

    // Execute migration SQL
    for statement in sql.split(";").filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement.trim()).execute(pool).await?;
    }

    // Record migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Migration v1: Initial schema
const MIGRATION_V1: &str = r#"
-- In-progress booking wizard drafts
CREATE TABLE IF NOT EXISTS booking_drafts (
    id TEXT PRIMARY KEY,
    current_step TEXT NOT NULL,
    draft TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_booking_drafts_updated ON booking_drafts(updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_booking_drafts_step ON booking_drafts(current_step);

-- Submitted bookings
CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    remote_id TEXT NOT NULL,
    booking_name TEXT NOT NULL,
    client TEXT NOT NULL,
    consignee TEXT NOT NULL,
    driver_id TEXT,
    estimated_total INTEGER NOT NULL,
    draft TEXT NOT NULL,
    submitted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookings_submitted ON bookings(submitted_at DESC);
CREATE INDEX IF NOT EXISTS idx_bookings_driver ON bookings(driver_id);

-- Rate tables
CREATE TABLE IF NOT EXISTS demurrage_rates (
    location TEXT PRIMARY KEY,
    daily_rate REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS compliance_charges (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS haulage_tariffs (
    area_name TEXT PRIMARY KEY,
    grand_total REAL NOT NULL
);
"#;

/// Migration v2: Driver roster
const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS drivers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT,
    available INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drivers_available ON drivers(available);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let version = get_current_version(&pool).await.unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
