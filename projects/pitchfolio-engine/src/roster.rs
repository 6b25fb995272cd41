//! Working state for the pitch: the active formation plus the holdings
//! occupying its slots. This is the state a front end mutates; everything
//! here validates against the formation and stock catalogs.

use chrono::NaiveDate;

use crate::catalog::{self, RecommendedPortfolio};
use crate::error::{EngineError, Result};
use crate::market::MarketData;
use crate::model::{Formation, Holding, RiskTier, Slot};

/// Form input for assigning a ticker to a slot. Fields mirror the entry
/// form; missing required fields fail validation rather than defaulting.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestmentDetails {
    pub share_count: Option<f64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    /// Overrides the catalog's default tier when set.
    pub risk_tier: Option<RiskTier>,
}

/// Partial edit of an existing holding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingChanges {
    pub share_count: Option<f64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub risk_tier: Option<RiskTier>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    formation: &'static Formation,
    holdings: Vec<Holding>,
}

impl Roster {
    pub fn new() -> Self {
        Self { formation: catalog::default_formation(), holdings: Vec::new() }
    }

    pub fn formation(&self) -> &'static Formation {
        self.formation
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn holdings_mut(&mut self) -> &mut [Holding] {
        &mut self.holdings
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn holding_at(&self, slot: Slot) -> Option<&Holding> {
        let id = slot.id();
        self.holdings.iter().find(|h| h.id == id)
    }

    /// Assign a catalog ticker to a slot. The slot must exist in the
    /// current formation and the investment details must be complete and
    /// non-negative. An occupied slot is replaced, never duplicated.
    /// Returns the holding id.
    pub fn assign(
        &mut self,
        market: &MarketData,
        slot: Slot,
        ticker: &str,
        details: InvestmentDetails,
    ) -> Result<String> {
        self.check_slot(slot)?;

        let info = catalog::stock(ticker)
            .ok_or_else(|| EngineError::UnknownTicker(ticker.to_string()))?;

        let share_count = details
            .share_count
            .ok_or_else(|| EngineError::Validation("share count is required".to_string()))?;
        let purchase_price = details
            .purchase_price
            .ok_or_else(|| EngineError::Validation("purchase price is required".to_string()))?;
        let purchase_date = details
            .purchase_date
            .ok_or_else(|| EngineError::Validation("purchase date is required".to_string()))?;

        if share_count < 0.0 {
            return Err(EngineError::Validation("share count must not be negative".to_string()));
        }
        if purchase_price < 0.0 {
            return Err(EngineError::Validation("purchase price must not be negative".to_string()));
        }

        let (current_price, dividend_yield_percent) = match market.quote(ticker) {
            Some(quote) => (quote.current_price, quote.dividend_yield_percent),
            None => (info.initial_price, info.dividend_yield_percent),
        };

        let id = slot.id();
        let holding = Holding {
            id: id.clone(),
            ticker: info.ticker.to_string(),
            display_name: info.name.to_string(),
            risk_tier: details.risk_tier.unwrap_or(info.risk_tier),
            position: slot.position,
            slot_index: slot.index,
            share_count,
            purchase_price,
            purchase_date,
            current_price,
            dividend_yield_percent,
            previous_price: current_price,
            price_change: 0.0,
            price_change_percent: 0.0,
        };

        self.holdings.retain(|h| h.id != id);
        self.holdings.push(holding);
        log::debug!("assigned {} to slot {}", ticker, id);
        Ok(id)
    }

    /// Edit an existing holding in place.
    pub fn edit(&mut self, id: &str, changes: HoldingChanges) -> Result<()> {
        if let Some(shares) = changes.share_count {
            if shares < 0.0 {
                return Err(EngineError::Validation(
                    "share count must not be negative".to_string(),
                ));
            }
        }
        if let Some(price) = changes.purchase_price {
            if price < 0.0 {
                return Err(EngineError::Validation(
                    "purchase price must not be negative".to_string(),
                ));
            }
        }

        let holding = self
            .holdings
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| EngineError::HoldingNotFound(id.to_string()))?;

        if let Some(shares) = changes.share_count {
            holding.share_count = shares;
        }
        if let Some(price) = changes.purchase_price {
            holding.purchase_price = price;
        }
        if let Some(date) = changes.purchase_date {
            holding.purchase_date = date;
        }
        if let Some(tier) = changes.risk_tier {
            holding.risk_tier = tier;
        }
        Ok(())
    }

    /// Remove the holding with the given id. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.id != id);
        self.holdings.len() != before
    }

    /// Switch to a different formation preset. Clears all holdings so
    /// slots can never dangle past the new formation's bounds.
    pub fn set_formation(&mut self, code: &str) -> Result<()> {
        let formation = catalog::formation(code)
            .ok_or_else(|| EngineError::UnknownFormation(code.to_string()))?;
        self.formation = formation;
        self.holdings.clear();
        Ok(())
    }

    /// Load a recommended portfolio: switches to its formation and fills
    /// slots from its templates. Templates that overflow the formation or
    /// reference unknown tickers are skipped with a warning.
    pub fn apply_preset(&mut self, preset: &RecommendedPortfolio, market: &MarketData) -> Result<()> {
        self.set_formation(preset.formation)?;

        let mut next_index = [0usize; 3];
        for template in preset.players {
            let index = next_index[template.position as usize];
            if index >= self.formation.slot_count(template.position) {
                log::warn!(
                    "preset {} has more {} entries than formation {} slots; skipping {}",
                    preset.name,
                    template.position,
                    self.formation.code,
                    template.ticker
                );
                continue;
            }

            let Some(info) = catalog::stock(template.ticker) else {
                log::warn!(
                    "preset {} references unknown ticker {}; skipping",
                    preset.name,
                    template.ticker
                );
                continue;
            };
            next_index[template.position as usize] += 1;

            let slot = Slot::new(template.position, index);
            let (current_price, dividend_yield_percent) = match market.quote(template.ticker) {
                Some(quote) => (quote.current_price, quote.dividend_yield_percent),
                None => (info.initial_price, info.dividend_yield_percent),
            };

            self.holdings.push(Holding {
                id: slot.id(),
                ticker: info.ticker.to_string(),
                display_name: info.name.to_string(),
                risk_tier: template.risk_tier,
                position: template.position,
                slot_index: index,
                share_count: template.share_count,
                purchase_price: template.purchase_price,
                purchase_date: NaiveDate::parse_from_str(template.purchase_date, "%Y-%m-%d")
                    .unwrap_or_default(),
                current_price,
                dividend_yield_percent,
                previous_price: current_price,
                price_change: 0.0,
                price_change_percent: 0.0,
            });
        }

        log::info!("applied preset {} ({} holdings)", preset.name, self.holdings.len());
        Ok(())
    }

    /// Snapshot for persistence: the formation code plus a deep copy of
    /// the holdings.
    pub fn snapshot(&self) -> (String, Vec<Holding>) {
        (self.formation.code.to_string(), self.holdings.clone())
    }

    /// Restore a persisted snapshot. Holdings whose slots do not fit the
    /// snapshot's formation are dropped with a warning rather than
    /// breaking the slot invariant.
    pub fn restore(&mut self, formation_code: &str, holdings: Vec<Holding>) -> Result<()> {
        let formation = catalog::formation(formation_code)
            .ok_or_else(|| EngineError::UnknownFormation(formation_code.to_string()))?;

        let mut restored: Vec<Holding> = Vec::with_capacity(holdings.len());
        for holding in holdings {
            if holding.slot_index >= formation.slot_count(holding.position) {
                log::warn!(
                    "dropping holding {} ({}): slot out of range for formation {}",
                    holding.id,
                    holding.ticker,
                    formation.code
                );
                continue;
            }
            if restored.iter().any(|h: &Holding| h.id == holding.id) {
                log::warn!("dropping duplicate holding id {}", holding.id);
                continue;
            }
            restored.push(holding);
        }

        self.formation = formation;
        self.holdings = restored;
        Ok(())
    }

    fn check_slot(&self, slot: Slot) -> Result<()> {
        if slot.index >= self.formation.slot_count(slot.position) {
            return Err(EngineError::SlotOutOfRange {
                formation: self.formation.code.to_string(),
                position: slot.position,
                index: slot.index,
            });
        }
        Ok(())
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
