use crate::errors::{Result, StoreError};
use crate::migrations::apply_migrations;
use crate::types::{PortfolioChanges, PortfolioInput, SavedPortfolio, UserProfile};

use pitchfolio_engine::Holding;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Main database manager
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Create a new database instance at the default path
    pub async fn new() -> Result<Self> {
        let path = crate::get_database_path();
        Self::open_at_path(path).await
    }

    /// Create a database instance at a specific path
    pub async fn open_at_path(path: PathBuf) -> Result<Self> {
        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::info!("Opening database at: {:?}", path);

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        if let Err(e) = apply_migrations(&conn) {
            log::error!("Failed to apply migrations: {}", e);
            return Err(e);
        }

        Ok(Database { connection: Arc::new(Mutex::new(conn)), path })
    }

    /// Create an in-memory database instance for testing
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        if let Err(e) = apply_migrations(&conn) {
            log::error!("Failed to apply migrations to in-memory database: {}", e);
            return Err(e);
        }

        Ok(Database {
            connection: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Health check - ensure database is accessible
    pub async fn health_check(&self) -> Result<()> {
        let conn = self.connection.lock().await;
        match conn.query_row("SELECT 1", [], |_| Ok(())) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("Health check failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Execute a closure with database connection
    pub async fn with_connection<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send,
        R: Send,
    {
        let conn = self.connection.lock().await;
        f(&conn)
    }

    /// Execute a transaction
    pub async fn transaction<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send,
        R: Send,
    {
        let mut conn = self.connection.lock().await;
        let tx = conn.transaction()?;

        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Get current UNIX timestamp
    pub fn current_timestamp() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    // ========== User Methods ==========

    /// Create a new account. Fails with `EmailTaken` if the email is
    /// already registered.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile> {
        if email.trim().is_empty() || password.is_empty() || display_name.trim().is_empty() {
            return Err(StoreError::Validation(
                "email, password, and display name are required".to_string(),
            ));
        }

        let now = Self::current_timestamp();
        self.with_connection(move |conn| {
            let existing: Option<i64> = conn
                .query_row("SELECT id FROM users WHERE email = ?1", [email], |row| row.get(0))
                .optional()?;
            if existing.is_some() {
                return Err(StoreError::EmailTaken(email.to_string()));
            }

            conn.execute(
                "INSERT INTO users (email, password, display_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![email, password, display_name, now],
            )?;

            let profile = UserProfile {
                id: conn.last_insert_rowid(),
                email: email.to_string(),
                display_name: display_name.to_string(),
                created_at: now,
            };
            log::info!("Registered user {} ({})", profile.id, profile.email);
            Ok(profile)
        })
        .await
    }

    /// Find the account matching an (email, password) pair.
    pub async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserProfile>> {
        self.with_connection(move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, email, display_name, created_at FROM users
                     WHERE email = ?1 AND password = ?2",
                    rusqlite::params![email, password],
                    row_to_profile,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    /// Get an account by id
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>> {
        self.with_connection(move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, email, display_name, created_at FROM users WHERE id = ?1",
                    [user_id],
                    row_to_profile,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    // ========== Portfolio Methods ==========

    /// Append a new manual save and return its id. Names are not
    /// deduplicated; every save is a fresh record.
    pub async fn save_portfolio(&self, user_id: i64, input: &PortfolioInput) -> Result<i64> {
        let now = Self::current_timestamp();
        let holdings_json = serde_json::to_string(&input.holdings)?;

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO portfolios (user_id, name, formation, holdings, is_autosave, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, FALSE, ?5, ?5)",
                rusqlite::params![user_id, input.name, input.formation, holdings_json, now],
            )?;

            let id = conn.last_insert_rowid();
            log::info!("Saved portfolio {} ({:?}) for user {}", id, input.name, user_id);
            Ok(id)
        })
        .await
    }

    /// Merge partial fields into an existing record and bump updated_at.
    /// Returns false when the id does not exist for that user.
    pub async fn update_portfolio(
        &self,
        user_id: i64,
        portfolio_id: i64,
        changes: &PortfolioChanges,
    ) -> Result<bool> {
        let now = Self::current_timestamp();
        let holdings_json = match &changes.holdings {
            Some(holdings) => Some(serde_json::to_string(holdings)?),
            None => None,
        };

        self.with_connection(move |conn| {
            let updated = conn.execute(
                "UPDATE portfolios SET
                    name = COALESCE(?1, name),
                    formation = COALESCE(?2, formation),
                    holdings = COALESCE(?3, holdings),
                    updated_at = ?4
                 WHERE id = ?5 AND user_id = ?6",
                rusqlite::params![
                    changes.name,
                    changes.formation,
                    holdings_json,
                    now,
                    portfolio_id,
                    user_id
                ],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    /// All saved portfolios for a user, most recently updated first.
    /// A record whose holdings blob fails to parse lists with an empty
    /// holding list; the fault is logged, never propagated.
    pub async fn list_portfolios(&self, user_id: i64) -> Result<Vec<SavedPortfolio>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, formation, holdings, is_autosave, created_at, updated_at
                 FROM portfolios
                 WHERE user_id = ?1
                 ORDER BY updated_at DESC, id DESC",
            )?;

            let portfolios = stmt
                .query_map([user_id], row_to_portfolio)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(portfolios)
        })
        .await
    }

    /// Get a specific saved portfolio
    pub async fn get_portfolio(
        &self,
        user_id: i64,
        portfolio_id: i64,
    ) -> Result<Option<SavedPortfolio>> {
        self.with_connection(move |conn| {
            let portfolio = conn
                .query_row(
                    "SELECT id, user_id, name, formation, holdings, is_autosave, created_at, updated_at
                     FROM portfolios
                     WHERE id = ?1 AND user_id = ?2",
                    rusqlite::params![portfolio_id, user_id],
                    row_to_portfolio,
                )
                .optional()?;
            Ok(portfolio)
        })
        .await
    }

    /// Delete a saved portfolio. Returns false when the id does not exist
    /// for that user; the collection is left unchanged in that case.
    pub async fn delete_portfolio(&self, user_id: i64, portfolio_id: i64) -> Result<bool> {
        self.with_connection(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM portfolios WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![portfolio_id, user_id],
            )?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Upsert the single autosave row for a user: update it if present,
    /// create it otherwise. Returns the autosave row id.
    pub async fn autosave_portfolio(
        &self,
        user_id: i64,
        name: &str,
        formation: &str,
        holdings: &[Holding],
    ) -> Result<i64> {
        let now = Self::current_timestamp();
        let holdings_json = serde_json::to_string(holdings)?;

        self.with_connection(move |conn| {
            let updated = conn.execute(
                "UPDATE portfolios SET name = ?1, formation = ?2, holdings = ?3, updated_at = ?4
                 WHERE user_id = ?5 AND is_autosave",
                rusqlite::params![name, formation, holdings_json, now, user_id],
            )?;

            if updated == 0 {
                conn.execute(
                    "INSERT INTO portfolios (user_id, name, formation, holdings, is_autosave, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, TRUE, ?5, ?5)",
                    rusqlite::params![user_id, name, formation, holdings_json, now],
                )?;
                let id = conn.last_insert_rowid();
                log::debug!("Created autosave {} for user {}", id, user_id);
                Ok(id)
            } else {
                let id: i64 = conn.query_row(
                    "SELECT id FROM portfolios WHERE user_id = ?1 AND is_autosave",
                    [user_id],
                    |row| row.get(0),
                )?;
                log::debug!("Updated autosave {} for user {}", id, user_id);
                Ok(id)
            }
        })
        .await
    }

    /// The user's autosave row, if any. Used for startup restore.
    pub async fn get_autosave(&self, user_id: i64) -> Result<Option<SavedPortfolio>> {
        self.with_connection(move |conn| {
            let portfolio = conn
                .query_row(
                    "SELECT id, user_id, name, formation, holdings, is_autosave, created_at, updated_at
                     FROM portfolios
                     WHERE user_id = ?1 AND is_autosave",
                    [user_id],
                    row_to_portfolio,
                )
                .optional()?;
            Ok(portfolio)
        })
        .await
    }

    // ========== Meta Methods ==========

    /// Set a meta key
    pub async fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO meta (key, val) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    /// Get a meta key
    pub async fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(move |conn| {
            let value: Option<String> = conn
                .query_row("SELECT val FROM meta WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
        .await
    }

    /// Delete a meta key
    pub async fn delete_meta(&self, key: &str) -> Result<()> {
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM meta WHERE key = ?1", [key])?;
            Ok(())
        })
        .await
    }
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_portfolio(row: &Row<'_>) -> rusqlite::Result<SavedPortfolio> {
    let id: i64 = row.get(0)?;
    let holdings_raw: String = row.get(4)?;

    // Unreadable holdings degrade to an empty list so one bad blob can
    // never poison the whole listing.
    let holdings = match serde_json::from_str(&holdings_raw) {
        Ok(holdings) => holdings,
        Err(e) => {
            log::warn!("Portfolio {} has unreadable holdings data, treating as empty: {}", id, e);
            Vec::new()
        }
    };

    Ok(SavedPortfolio {
        id,
        user_id: row.get(1)?,
        name: row.get(2)?,
        formation: row.get(3)?,
        holdings,
        is_autosave: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
