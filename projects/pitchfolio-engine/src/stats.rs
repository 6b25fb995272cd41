//! Pure aggregation over a snapshot of holdings. Every function here is
//! deterministic for identical inputs, has no side effects, and returns
//! zero totals / empty breakdowns for an empty holding list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog;
use crate::model::{Holding, PositionType};

/// Display cap for the top-holdings breakdown. The cap only truncates the
/// returned list; totals are unaffected.
pub const TOP_HOLDINGS_CAP: usize = 6;

// ========== Position-Tier Weights ==========

#[derive(Debug, Clone, Serialize)]
pub struct GroupStat {
    pub value: f64,
    pub percentage: f64,
    pub count: usize,
    /// Members of the group, sorted by market value descending.
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionWeights {
    pub defender: GroupStat,
    pub midfielder: GroupStat,
    pub forward: GroupStat,
    pub total_value: f64,
}

impl PositionWeights {
    pub fn group(&self, position: PositionType) -> &GroupStat {
        match position {
            PositionType::Defender => &self.defender,
            PositionType::Midfielder => &self.midfielder,
            PositionType::Forward => &self.forward,
        }
    }
}

/// Investment weight per position group. Weights tie out to 100 across
/// the three groups whenever the total value is positive.
pub fn position_weights(holdings: &[Holding]) -> PositionWeights {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();

    let group = |position: PositionType| -> GroupStat {
        let mut members: Vec<Holding> = holdings
            .iter()
            .filter(|h| h.position == position)
            .cloned()
            .collect();
        members.sort_by(|a, b| by_value_desc(a.market_value(), b.market_value()));

        let value: f64 = members.iter().map(Holding::market_value).sum();
        GroupStat {
            value,
            percentage: ratio_percent(value, total_value),
            count: members.len(),
            holdings: members,
        }
    };

    PositionWeights {
        defender: group(PositionType::Defender),
        midfielder: group(PositionType::Midfielder),
        forward: group(PositionType::Forward),
        total_value,
    }
}

// ========== Per-Holding Weights ==========

#[derive(Debug, Clone, Serialize)]
pub struct HoldingWeight {
    pub ticker: String,
    pub display_name: String,
    pub value: f64,
    pub weight: f64,
}

/// Per-holding investment weights, sorted descending and truncated to
/// `cap` entries.
pub fn holding_weights(holdings: &[Holding], cap: usize) -> Vec<HoldingWeight> {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();

    let mut weights: Vec<HoldingWeight> = holdings
        .iter()
        .map(|h| HoldingWeight {
            ticker: h.ticker.clone(),
            display_name: h.display_name.clone(),
            value: h.market_value(),
            weight: ratio_percent(h.market_value(), total_value),
        })
        .collect();

    weights.sort_by(|a, b| by_value_desc(a.weight, b.weight));
    weights.truncate(cap);
    weights
}

// ========== Sector Weights ==========

#[derive(Debug, Clone, Serialize)]
pub struct SectorWeight {
    pub sector: &'static str,
    pub value: f64,
    pub weight: f64,
}

/// Investment weight per sector, via the static ticker→sector table
/// (unknown tickers land in the default sector). Sorted descending.
pub fn sector_weights(holdings: &[Holding]) -> Vec<SectorWeight> {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();

    let mut by_sector: BTreeMap<&'static str, f64> = BTreeMap::new();
    for holding in holdings {
        *by_sector.entry(catalog::sector_for(&holding.ticker)).or_insert(0.0) +=
            holding.market_value();
    }

    let mut weights: Vec<SectorWeight> = by_sector
        .into_iter()
        .map(|(sector, value)| SectorWeight {
            sector,
            value,
            weight: ratio_percent(value, total_value),
        })
        .collect();

    weights.sort_by(|a, b| by_value_desc(a.weight, b.weight));
    weights
}

// ========== Return Metrics ==========

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReturnMetrics {
    pub total_invested: f64,
    pub total_current: f64,
    pub total_return: f64,
    pub return_percent: f64,
}

pub fn return_metrics(holdings: &[Holding]) -> ReturnMetrics {
    let total_invested: f64 = holdings.iter().map(Holding::cost_basis).sum();
    let total_current: f64 = holdings.iter().map(Holding::market_value).sum();
    let total_return = total_current - total_invested;

    ReturnMetrics {
        total_invested,
        total_current,
        total_return,
        return_percent: ratio_percent(total_return, total_invested),
    }
}

// ========== Dividend Projection ==========

#[derive(Debug, Clone, Serialize)]
pub struct DividendContribution {
    pub ticker: String,
    pub display_name: String,
    pub annual_dividend: f64,
    pub dividend_yield_percent: f64,
    /// Share of the portfolio's total projected dividend.
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DividendProjection {
    pub total_annual: f64,
    /// Per-ticker contributions sorted by annual dividend descending.
    pub contributions: Vec<DividendContribution>,
}

/// Projected annual dividend income. Per holding the annual dividend per
/// share is purchase_price × yield / 100.
pub fn dividend_projection(holdings: &[Holding]) -> DividendProjection {
    let total_annual: f64 = holdings.iter().map(Holding::annual_dividend).sum();

    let mut contributions: Vec<DividendContribution> = holdings
        .iter()
        .map(|h| DividendContribution {
            ticker: h.ticker.clone(),
            display_name: h.display_name.clone(),
            annual_dividend: h.annual_dividend(),
            dividend_yield_percent: h.dividend_yield_percent,
            weight: ratio_percent(h.annual_dividend(), total_annual),
        })
        .collect();

    contributions.sort_by(|a, b| by_value_desc(a.annual_dividend, b.annual_dividend));

    DividendProjection { total_annual, contributions }
}

// ========== Monthly Dividend Schedule ==========

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPayer {
    pub ticker: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyDividend {
    /// Calendar month, 1-12.
    pub month: u32,
    pub total: f64,
    pub payers: Vec<MonthlyPayer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DividendCalendar {
    pub months: [MonthlyDividend; 12],
}

impl DividendCalendar {
    /// Sum of all monthly buckets. For schedules other than quarterly
    /// this does NOT equal the annual projection: every payment month
    /// receives the quarterly-equivalent amount, so monthly payers are
    /// overstated and annual payers understated. Kept that way on
    /// purpose; see DESIGN.md.
    pub fn total(&self) -> f64 {
        self.months.iter().map(|m| m.total).sum()
    }

    pub fn peak_month(&self) -> &MonthlyDividend {
        self.months
            .iter()
            .max_by(|a, b| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal))
            .unwrap_or(&self.months[0])
    }

    pub fn paying_month_count(&self) -> usize {
        self.months.iter().filter(|m| m.total > 0.0).count()
    }

    pub fn monthly_average(&self) -> f64 {
        self.total() / 12.0
    }
}

/// 12-bucket dividend schedule. Each holding contributes its
/// quarterly-equivalent payment (annual per-share / 4 × shares) to every
/// month in its ticker's payment schedule.
pub fn monthly_dividends(holdings: &[Holding]) -> DividendCalendar {
    let mut months: [MonthlyDividend; 12] = std::array::from_fn(|i| MonthlyDividend {
        month: (i + 1) as u32,
        total: 0.0,
        payers: Vec::new(),
    });

    for holding in holdings {
        let per_payment = holding.annual_dividend_per_share() / 4.0 * holding.share_count;
        for &month in catalog::dividend_months(&holding.ticker) {
            if (1..=12).contains(&month) {
                let bucket = &mut months[(month - 1) as usize];
                bucket.total += per_payment;
                bucket.payers.push(MonthlyPayer {
                    ticker: holding.ticker.clone(),
                    amount: per_payment,
                });
            }
        }
    }

    DividendCalendar { months }
}

// ========== Helpers ==========

fn ratio_percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn by_value_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
