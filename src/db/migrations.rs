//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- One profile per authenticated user
        -- ============================================
        CREATE TABLE users (
            id TEXT PRIMARY KEY,                 -- opaque id from the auth provider
            name TEXT,
            system_of_measurement TEXT NOT NULL DEFAULT 'metric'
                CHECK(system_of_measurement IN ('metric', 'us', 'uk')),
            height REAL,                         -- reference height in cm
            date_of_birth TEXT,                  -- ISO date: "1990-04-12"
            sex TEXT NOT NULL DEFAULT 'not specified'
                CHECK(sex IN ('male', 'female', 'not specified')),
            onboarding_completed INTEGER NOT NULL DEFAULT 0,  -- boolean

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- BMI ENTRIES
        -- Height/weight observations, always stored in cm/kg
        -- ============================================
        CREATE TABLE bmi_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            timestamp TEXT NOT NULL,
            height REAL NOT NULL CHECK(height > 0),  -- cm
            weight REAL NOT NULL,                    -- kg

            -- Written together with height and weight, never recomputed on read
            bmi REAL NOT NULL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_bmi_entries_user_timestamp ON bmi_entries(user_id, timestamp);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version. A database without the version table is at 0.
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
