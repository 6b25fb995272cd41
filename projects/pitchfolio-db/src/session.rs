//! Minimal local identity: register/login/logout over the `users` table,
//! with the signed-in profile mirrored into the meta area so a restart
//! can rehydrate the session. Not a security boundary: passwords live
//! unencrypted in the local store, which is acceptable only because this
//! is a client-only demo.

use std::sync::Arc;

use crate::database::Database;
use crate::errors::{Result, StoreError};
use crate::types::UserProfile;

const SESSION_KEY: &str = "session_user";

pub struct SessionManager {
    db: Arc<Database>,
    current: Option<UserProfile>,
}

impl SessionManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db, current: None }
    }

    /// The signed-in profile, if any.
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Create an account and sign it in. Fails with `EmailTaken` when the
    /// email is already registered.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile> {
        let profile = self.db.create_user(email, password, display_name).await?;
        self.persist_session(&profile).await?;
        self.current = Some(profile.clone());
        Ok(profile)
    }

    /// Sign in with an (email, password) pair. Fails with
    /// `InvalidCredentials` when no account matches.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile> {
        let profile = self
            .db
            .find_user_by_credentials(email, password)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        self.persist_session(&profile).await?;
        self.current = Some(profile.clone());
        log::info!("User {} signed in", profile.id);
        Ok(profile)
    }

    /// Clear the in-memory session and the persisted profile.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.current.take() {
            log::info!("User {} signed out", user.id);
        }
        self.db.delete_meta(SESSION_KEY).await
    }

    /// Rehydrate the session from the persisted profile, if one exists.
    /// An unreadable stored profile is treated as signed-out: the blob is
    /// cleared and a warning logged.
    pub async fn restore(&mut self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.db.get_meta(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                self.current = Some(profile.clone());
                log::info!("Restored session for user {}", profile.id);
                Ok(Some(profile))
            }
            Err(e) => {
                log::warn!("Stored session profile is unreadable, clearing: {}", e);
                self.db.delete_meta(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn persist_session(&self, profile: &UserProfile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.db.set_meta(SESSION_KEY, &raw).await
    }
}
