use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pitchfolio_engine::Holding;

// ========== User Types ==========

/// Public view of an account: everything except the password. This is
/// what lives in the session and what callers get back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub created_at: i64,
}

// ========== Portfolio Types ==========

/// Display name carried by the autosave record. Identity is the
/// `is_autosave` flag, never this name.
pub const AUTOSAVE_NAME: &str = "Autosave";

/// A persisted portfolio snapshot. Holdings are embedded in full so the
/// record stays independent of later working-state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPortfolio {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub formation: String,
    pub holdings: Vec<Holding>,
    pub is_autosave: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SavedPortfolio {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.updated_at, 0)
    }

    /// Market value of the snapshot at its stored prices.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::market_value).sum()
    }
}

/// Input for a new manual save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub name: String,
    pub formation: String,
    pub holdings: Vec<Holding>,
}

/// Partial update of an existing record; unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct PortfolioChanges {
    pub name: Option<String>,
    pub formation: Option<String>,
    pub holdings: Option<Vec<Holding>>,
}
