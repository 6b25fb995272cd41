use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ========== Risk / Position Types ==========

/// Risk classification for a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Pitch role conventionally associated with this tier.
    pub fn default_position(&self) -> PositionType {
        match self {
            RiskTier::Low => PositionType::Defender,
            RiskTier::Medium => PositionType::Midfielder,
            RiskTier::High => PositionType::Forward,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pitch role group a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Defender,
    Midfielder,
    Forward,
}

impl PositionType {
    pub const ALL: [PositionType; 3] = [
        PositionType::Defender,
        PositionType::Midfielder,
        PositionType::Forward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::Defender => "defender",
            PositionType::Midfielder => "midfielder",
            PositionType::Forward => "forward",
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========== Slots ==========

/// One place on the pitch: a position group plus an index into that
/// group's coordinate list for the active formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub position: PositionType,
    pub index: usize,
}

impl Slot {
    pub fn new(position: PositionType, index: usize) -> Self {
        Self { position, index }
    }

    /// Deterministic holding id for this slot. At most one holding can
    /// carry a given id, so at most one holding occupies a given slot.
    pub fn id(&self) -> String {
        format!("{}-{}", self.position.as_str(), self.index)
    }
}

// ========== Holdings ==========

/// One stock position placed on the pitch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub ticker: String,
    pub display_name: String,
    pub risk_tier: RiskTier,
    pub position: PositionType,
    pub slot_index: usize,
    pub share_count: f64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub current_price: f64,
    pub dividend_yield_percent: f64,
    pub previous_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
}

impl Holding {
    pub fn slot(&self) -> Slot {
        Slot::new(self.position, self.slot_index)
    }

    /// Market value at the current price.
    pub fn market_value(&self) -> f64 {
        self.share_count * self.current_price
    }

    /// Amount originally invested.
    pub fn cost_basis(&self) -> f64 {
        self.share_count * self.purchase_price
    }

    /// Projected annual dividend per share, based on the purchase price.
    pub fn annual_dividend_per_share(&self) -> f64 {
        self.purchase_price * self.dividend_yield_percent / 100.0
    }

    /// Projected annual dividend across all shares.
    pub fn annual_dividend(&self) -> f64 {
        self.share_count * self.annual_dividend_per_share()
    }
}

// ========== Formations ==========

/// Named pitch layout: ordered slot coordinates per position group.
/// Formations are an immutable preset catalog; coordinates are percentages
/// of the pitch surface.
#[derive(Debug, Clone, Copy)]
pub struct Formation {
    pub code: &'static str,
    pub name: &'static str,
    pub defenders: &'static [(f64, f64)],
    pub midfielders: &'static [(f64, f64)],
    pub forwards: &'static [(f64, f64)],
}

impl Formation {
    pub fn slots_for(&self, position: PositionType) -> &'static [(f64, f64)] {
        match position {
            PositionType::Defender => self.defenders,
            PositionType::Midfielder => self.midfielders,
            PositionType::Forward => self.forwards,
        }
    }

    pub fn slot_count(&self, position: PositionType) -> usize {
        self.slots_for(position).len()
    }

    /// Coordinates for a slot, if the index is valid for this formation.
    pub fn coordinates(&self, slot: Slot) -> Option<(f64, f64)> {
        self.slots_for(slot.position).get(slot.index).copied()
    }
}
