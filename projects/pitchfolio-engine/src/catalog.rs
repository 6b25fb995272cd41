//! Static instrument, sector, dividend-schedule, formation, and preset
//! catalogs. All lookups degrade to documented defaults for unknown
//! tickers rather than failing.

use crate::model::{Formation, PositionType, RiskTier};

// ========== Stock Catalog ==========

/// One instrument known to the simulator.
#[derive(Debug, Clone, Copy)]
pub struct StockInfo {
    pub ticker: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub risk_tier: RiskTier,
    pub initial_price: f64,
    pub dividend_yield_percent: f64,
}

pub const STOCKS: &[StockInfo] = &[
    StockInfo { ticker: "AAPL", name: "Apple Inc.", sector: "Technology", risk_tier: RiskTier::Low, initial_price: 195.89, dividend_yield_percent: 0.43 },
    StockInfo { ticker: "MSFT", name: "Microsoft Corp.", sector: "Technology", risk_tier: RiskTier::Low, initial_price: 415.26, dividend_yield_percent: 0.68 },
    StockInfo { ticker: "GOOGL", name: "Alphabet Inc.", sector: "Technology", risk_tier: RiskTier::Medium, initial_price: 175.32, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "TSLA", name: "Tesla Inc.", sector: "Automotive", risk_tier: RiskTier::High, initial_price: 248.98, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "NVDA", name: "NVIDIA Corp.", sector: "Technology", risk_tier: RiskTier::High, initial_price: 140.15, dividend_yield_percent: 0.03 },
    StockInfo { ticker: "BTC", name: "Bitcoin", sector: "Cryptocurrency", risk_tier: RiskTier::High, initial_price: 97250.0, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "ETH", name: "Ethereum", sector: "Cryptocurrency", risk_tier: RiskTier::High, initial_price: 3420.5, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "SPY", name: "SPDR S&P 500 ETF", sector: "ETF", risk_tier: RiskTier::Medium, initial_price: 595.38, dividend_yield_percent: 1.23 },
    StockInfo { ticker: "QQQ", name: "Invesco QQQ Trust", sector: "ETF", risk_tier: RiskTier::Medium, initial_price: 515.67, dividend_yield_percent: 0.51 },
    StockInfo { ticker: "JNJ", name: "Johnson & Johnson", sector: "Healthcare", risk_tier: RiskTier::Low, initial_price: 148.92, dividend_yield_percent: 3.05 },
    StockInfo { ticker: "PG", name: "Procter & Gamble", sector: "Consumer Goods", risk_tier: RiskTier::Low, initial_price: 165.43, dividend_yield_percent: 2.31 },
    StockInfo { ticker: "KO", name: "Coca-Cola", sector: "Beverages", risk_tier: RiskTier::Low, initial_price: 62.84, dividend_yield_percent: 2.96 },
    StockInfo { ticker: "AMZN", name: "Amazon.com Inc.", sector: "E-commerce", risk_tier: RiskTier::Medium, initial_price: 215.44, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "META", name: "Meta Platforms Inc.", sector: "Social Media", risk_tier: RiskTier::Medium, initial_price: 563.92, dividend_yield_percent: 0.37 },
    StockInfo { ticker: "NFLX", name: "Netflix Inc.", sector: "Entertainment", risk_tier: RiskTier::Medium, initial_price: 875.43, dividend_yield_percent: 0.0 },
    StockInfo { ticker: "V", name: "Visa Inc.", sector: "Financial", risk_tier: RiskTier::Low, initial_price: 312.67, dividend_yield_percent: 0.69 },
    StockInfo { ticker: "JPM", name: "JPMorgan Chase", sector: "Banking", risk_tier: RiskTier::Medium, initial_price: 245.18, dividend_yield_percent: 2.05 },
    StockInfo { ticker: "WMT", name: "Walmart Inc.", sector: "Retail", risk_tier: RiskTier::Low, initial_price: 95.84, dividend_yield_percent: 2.87 },
    StockInfo { ticker: "SCHD", name: "Schwab US Dividend Equity ETF", sector: "ETF", risk_tier: RiskTier::Low, initial_price: 82.45, dividend_yield_percent: 3.47 },
    StockInfo { ticker: "CPNG", name: "Coupang Inc.", sector: "E-commerce", risk_tier: RiskTier::High, initial_price: 24.67, dividend_yield_percent: 0.0 },
];

/// Look up an instrument by exact ticker.
pub fn stock(ticker: &str) -> Option<&'static StockInfo> {
    STOCKS.iter().find(|s| s.ticker == ticker)
}

/// Case-insensitive substring search over ticker and name. An empty term
/// returns the full catalog.
pub fn search(term: &str) -> Vec<&'static StockInfo> {
    let term = term.to_lowercase();
    STOCKS
        .iter()
        .filter(|s| {
            term.is_empty()
                || s.ticker.to_lowercase().contains(&term)
                || s.name.to_lowercase().contains(&term)
        })
        .collect()
}

// ========== Sector Table ==========

pub const DEFAULT_SECTOR: &str = "Technology";

/// Aggregation sector for a ticker. Unknown tickers fall back to the
/// default sector.
pub fn sector_for(ticker: &str) -> &'static str {
    match ticker {
        "AAPL" | "MSFT" | "GOOGL" | "NVDA" | "AMD" | "INTC" | "CRM" | "ORCL" | "ADBE"
        | "NET" | "DDOG" | "MDB" | "TEAM" | "NOW" | "WDAY" | "OKTA" | "CRWD" | "ZS"
        | "PLTR" | "SNOW" | "ROKU" | "SQ" | "PYPL" | "TWLO" | "DOCU" | "SHOP" | "ZM"
        | "SNAP" | "SPOT" | "TWTR" => "Technology",
        "JNJ" | "VEEV" | "ZEN" => "Healthcare",
        "JPM" | "V" => "Financial",
        "AMZN" | "TSLA" | "DIS" | "BA" | "F" | "GM" | "UBER" | "ABNB" | "CPNG" => {
            "Consumer Discretionary"
        }
        "PG" | "KO" | "WMT" => "Consumer Staples",
        "GE" => "Industrial",
        "META" | "NFLX" | "T" | "VZ" => "Communication Services",
        "XOM" | "CVX" => "Energy",
        "SPY" | "QQQ" | "SCHD" => "ETF",
        "BTC" | "ETH" | "COIN" => "Cryptocurrency",
        _ => DEFAULT_SECTOR,
    }
}

// ========== Dividend Schedules ==========

const MONTHLY: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
const QUARTERLY: &[u32] = &[3, 6, 9, 12];
const SEMIANNUAL: &[u32] = &[6, 12];
const ANNUAL: &[u32] = &[12];

/// Calendar months (1-12) in which a ticker pays dividends. Unknown
/// tickers default to a quarterly schedule.
pub fn dividend_months(ticker: &str) -> &'static [u32] {
    match ticker {
        "AAPL" | "MSFT" | "GOOGL" | "JNJ" | "PG" | "KO" | "V" | "JPM" | "WMT" | "SCHD"
        | "SPY" | "QQQ" => QUARTERLY,
        "O" => MONTHLY,
        "BRK" => SEMIANNUAL,
        "AMZN" | "META" | "NFLX" | "TSLA" | "NVDA" | "BTC" | "ETH" => ANNUAL,
        _ => QUARTERLY,
    }
}

// ========== Formation Catalog ==========

pub static FORMATIONS: &[Formation] = &[
    Formation {
        code: "533",
        name: "5-3-3",
        defenders: &[(50.0, 85.0), (15.0, 70.0), (38.0, 65.0), (62.0, 65.0), (85.0, 70.0)],
        midfielders: &[(25.0, 45.0), (50.0, 40.0), (75.0, 45.0)],
        forwards: &[(30.0, 20.0), (50.0, 15.0), (70.0, 20.0)],
    },
    Formation {
        code: "542",
        name: "5-4-2",
        defenders: &[(50.0, 85.0), (15.0, 70.0), (38.0, 65.0), (62.0, 65.0), (85.0, 70.0)],
        midfielders: &[(15.0, 45.0), (38.0, 40.0), (62.0, 40.0), (85.0, 45.0)],
        forwards: &[(35.0, 20.0), (65.0, 20.0)],
    },
    Formation {
        code: "452",
        name: "4-5-2",
        defenders: &[(50.0, 85.0), (25.0, 70.0), (50.0, 65.0), (75.0, 70.0)],
        midfielders: &[(15.0, 50.0), (35.0, 40.0), (50.0, 35.0), (65.0, 40.0), (85.0, 50.0)],
        forwards: &[(35.0, 20.0), (65.0, 20.0)],
    },
    Formation {
        code: "5231",
        name: "5-2-3-1",
        defenders: &[(50.0, 85.0), (15.0, 70.0), (38.0, 65.0), (62.0, 65.0), (85.0, 70.0)],
        midfielders: &[(35.0, 50.0), (65.0, 50.0), (25.0, 30.0), (50.0, 25.0), (75.0, 30.0)],
        forwards: &[(50.0, 15.0)],
    },
];

/// Look up a formation preset by code.
pub fn formation(code: &str) -> Option<&'static Formation> {
    FORMATIONS.iter().find(|f| f.code == code)
}

pub fn default_formation() -> &'static Formation {
    &FORMATIONS[0]
}

// ========== Recommended Portfolios ==========

/// Template for one holding inside a recommended portfolio.
#[derive(Debug, Clone, Copy)]
pub struct HoldingTemplate {
    pub ticker: &'static str,
    pub risk_tier: RiskTier,
    pub position: PositionType,
    pub share_count: f64,
    pub purchase_price: f64,
    pub purchase_date: &'static str,
}

/// A curated starting portfolio: formation plus holding templates.
#[derive(Debug, Clone, Copy)]
pub struct RecommendedPortfolio {
    pub name: &'static str,
    pub description: &'static str,
    pub formation: &'static str,
    pub players: &'static [HoldingTemplate],
}

pub static RECOMMENDED: &[RecommendedPortfolio] = &[
    RecommendedPortfolio {
        name: "Stable Dividend Portfolio",
        description: "Conservative lineup built around steady dividend payers",
        formation: "533",
        players: &[
            HoldingTemplate { ticker: "SCHD", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 50.0, purchase_price: 82.45, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "JNJ", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 30.0, purchase_price: 148.92, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "PG", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 25.0, purchase_price: 165.43, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "KO", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 60.0, purchase_price: 62.84, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "V", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 15.0, purchase_price: 312.67, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "AAPL", risk_tier: RiskTier::Low, position: PositionType::Midfielder, share_count: 20.0, purchase_price: 195.89, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "MSFT", risk_tier: RiskTier::Low, position: PositionType::Midfielder, share_count: 10.0, purchase_price: 415.26, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "SPY", risk_tier: RiskTier::Medium, position: PositionType::Midfielder, share_count: 25.0, purchase_price: 595.38, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "GOOGL", risk_tier: RiskTier::Medium, position: PositionType::Forward, share_count: 15.0, purchase_price: 175.32, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "META", risk_tier: RiskTier::Medium, position: PositionType::Forward, share_count: 5.0, purchase_price: 563.92, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "AMZN", risk_tier: RiskTier::Medium, position: PositionType::Forward, share_count: 12.0, purchase_price: 215.44, purchase_date: "2024-01-01" },
        ],
    },
    RecommendedPortfolio {
        name: "Growth Tech Portfolio",
        description: "Aggressive lineup chasing high-growth technology names",
        formation: "452",
        players: &[
            HoldingTemplate { ticker: "AAPL", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 25.0, purchase_price: 195.89, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "MSFT", risk_tier: RiskTier::Low, position: PositionType::Defender, share_count: 12.0, purchase_price: 415.26, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "SPY", risk_tier: RiskTier::Medium, position: PositionType::Defender, share_count: 20.0, purchase_price: 595.38, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "QQQ", risk_tier: RiskTier::Medium, position: PositionType::Defender, share_count: 15.0, purchase_price: 515.67, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "NVDA", risk_tier: RiskTier::High, position: PositionType::Midfielder, share_count: 30.0, purchase_price: 140.15, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "GOOGL", risk_tier: RiskTier::Medium, position: PositionType::Midfielder, share_count: 20.0, purchase_price: 175.32, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "META", risk_tier: RiskTier::Medium, position: PositionType::Midfielder, share_count: 8.0, purchase_price: 563.92, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "AMZN", risk_tier: RiskTier::Medium, position: PositionType::Midfielder, share_count: 15.0, purchase_price: 215.44, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "NFLX", risk_tier: RiskTier::Medium, position: PositionType::Midfielder, share_count: 4.0, purchase_price: 875.43, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "TSLA", risk_tier: RiskTier::High, position: PositionType::Forward, share_count: 15.0, purchase_price: 248.98, purchase_date: "2024-01-01" },
            HoldingTemplate { ticker: "CPNG", risk_tier: RiskTier::High, position: PositionType::Forward, share_count: 80.0, purchase_price: 24.67, purchase_date: "2024-01-01" },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_lookup_is_exact() {
        assert_eq!(stock("AAPL").unwrap().name, "Apple Inc.");
        assert!(stock("aapl").is_none());
        assert!(stock("ZZZZ").is_none());
    }

    #[test]
    fn search_matches_ticker_and_name() {
        let by_ticker = search("msft");
        assert_eq!(by_ticker.len(), 1);
        assert_eq!(by_ticker[0].ticker, "MSFT");

        let by_name = search("coca");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].ticker, "KO");

        assert_eq!(search("").len(), STOCKS.len());
    }

    #[test]
    fn unknown_ticker_gets_default_sector() {
        assert_eq!(sector_for("ZZZZ"), DEFAULT_SECTOR);
        assert_eq!(sector_for("KO"), "Consumer Staples");
        assert_eq!(sector_for("BTC"), "Cryptocurrency");
    }

    #[test]
    fn unknown_ticker_pays_quarterly() {
        assert_eq!(dividend_months("ZZZZ"), &[3, 6, 9, 12]);
        assert_eq!(dividend_months("O").len(), 12);
        assert_eq!(dividend_months("AMZN"), &[12]);
    }

    #[test]
    fn formation_slot_counts_match_codes() {
        let f = formation("533").unwrap();
        assert_eq!(f.defenders.len(), 5);
        assert_eq!(f.midfielders.len(), 3);
        assert_eq!(f.forwards.len(), 3);
        assert!(formation("999").is_none());
    }

    #[test]
    fn presets_fit_their_formations() {
        for preset in RECOMMENDED {
            let f = formation(preset.formation).expect("preset references known formation");
            for position in crate::model::PositionType::ALL {
                let used = preset.players.iter().filter(|p| p.position == position).count();
                assert!(
                    used <= f.slot_count(position),
                    "{} overflows {} slots in {}",
                    preset.name,
                    position,
                    f.code
                );
            }
        }
    }

    #[test]
    fn preset_tickers_exist_in_catalog() {
        for preset in RECOMMENDED {
            for player in preset.players {
                assert!(stock(player.ticker).is_some(), "unknown ticker {}", player.ticker);
            }
        }
    }
}
