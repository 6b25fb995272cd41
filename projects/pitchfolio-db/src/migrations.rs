use crate::errors::Result;
use rusqlite::Connection;

/// Initialize the database schema
pub fn apply_migrations(conn: &Connection) -> Result<()> {
    // Enable WAL mode and foreign keys
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    log::info!("Creating database schema...");

    conn.execute_batch(FULL_SCHEMA)?;

    log::info!("Database schema created successfully");
    Ok(())
}

// Complete database schema - all tables and indexes
const FULL_SCHEMA: &str = r#"
-- Pitchfolio Database Schema v1
PRAGMA journal_mode=WAL;
PRAGMA foreign_keys = ON;

-- Local accounts. Passwords are stored as entered: this store is a
-- client-only demo surface, not a credential boundary.
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    email        TEXT NOT NULL UNIQUE,
    password     TEXT NOT NULL,
    display_name TEXT NOT NULL,
    created_at   INTEGER NOT NULL    -- epoch seconds
);

-- Saved portfolio snapshots, one row per save. Holdings are embedded as a
-- JSON blob so each save is independent of later working-state changes.
CREATE TABLE IF NOT EXISTS portfolios (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    formation    TEXT NOT NULL,      -- formation code, e.g. "533"
    holdings     TEXT NOT NULL,      -- JSON array of holdings
    is_autosave  BOOLEAN NOT NULL DEFAULT FALSE,
    created_at   INTEGER NOT NULL,   -- epoch seconds
    updated_at   INTEGER NOT NULL    -- epoch seconds
);

-- At most one autosave row per user; manual saves are unconstrained.
CREATE UNIQUE INDEX IF NOT EXISTS idx_portfolios_autosave
    ON portfolios(user_id) WHERE is_autosave;

CREATE INDEX IF NOT EXISTS idx_portfolios_user
    ON portfolios(user_id, updated_at);

-- Key/value area for session state and app flags
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    val TEXT NOT NULL
);
"#;
