//! Persistence layer for pitchfolio: local accounts, session state, and
//! saved portfolio snapshots in a single SQLite file, plus the debounced
//! autosaver that keeps the working state on disk.

pub mod autosave;
pub mod database;
pub mod errors;
pub mod migrations;
pub mod session;
pub mod types;

// Re-export main types and the database
pub use autosave::{AutosaveRequest, Autosaver, DEFAULT_DEBOUNCE};
pub use database::Database;
pub use errors::StoreError;
pub use session::SessionManager;
pub use types::*;

use std::path::PathBuf;

/// Initialize the database and return a Database instance
pub async fn init_database() -> anyhow::Result<Database> {
    Database::new().await.map_err(Into::into)
}

/// Get the default database path
pub fn get_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pitchfolio")
        .join("pitchfolio.db")
}

/// Check if the database file exists
pub fn database_exists() -> bool {
    get_database_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_initialization() {
        let _ = env_logger::try_init();
        let db = Database::new_in_memory().await.unwrap();
        assert!(db.health_check().await.is_ok());
    }
}
