//! Portfolio engine mapping stock holdings onto football formations.
//!
//! Risk tiers play as pitch roles (low/defender, medium/midfielder,
//! high/forward). The engine owns the working state, a simulated market
//! feed, and the pure aggregation used for portfolio statistics; it has
//! no presentation surface.

pub mod catalog;
pub mod error;
pub mod market;
pub mod model;
pub mod refresh;
pub mod roster;
pub mod stats;

// Re-export the main types for easier access
pub use error::{EngineError, Result};
pub use market::{MarketData, Quote, INITIAL_USD_TO_KRW};
pub use model::{Formation, Holding, PositionType, RiskTier, Slot};
pub use refresh::{MarketRefresher, DEFAULT_REFRESH_INTERVAL};
pub use roster::{HoldingChanges, InvestmentDetails, Roster};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
