//! Simulated market data: per-ticker quotes plus a shared exchange rate,
//! perturbed randomly on each refresh. Purely derived state, safe to
//! recompute at any time, never persisted.

use std::collections::HashMap;

use rand::Rng;

use crate::catalog;
use crate::model::Holding;

pub const INITIAL_USD_TO_KRW: f64 = 1320.0;

/// Prices never drop below one cent.
const MIN_PRICE: f64 = 0.01;
/// The simulated exchange rate never drops below this floor.
const MIN_FX_RATE: f64 = 1000.0;

/// Current quote for one ticker.
#[derive(Debug, Clone, Copy)]
pub struct Quote {
    pub current_price: f64,
    pub previous_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub dividend_yield_percent: f64,
}

/// Injected market state: quotes keyed by ticker plus the USD→KRW rate.
#[derive(Debug, Clone)]
pub struct MarketData {
    quotes: HashMap<String, Quote>,
    usd_to_krw: f64,
}

impl MarketData {
    /// Seed quotes from the static stock catalog.
    pub fn from_catalog() -> Self {
        let quotes = catalog::STOCKS
            .iter()
            .map(|s| {
                (
                    s.ticker.to_string(),
                    Quote {
                        current_price: s.initial_price,
                        previous_price: s.initial_price,
                        price_change: 0.0,
                        price_change_percent: 0.0,
                        dividend_yield_percent: s.dividend_yield_percent,
                    },
                )
            })
            .collect();
        Self { quotes, usd_to_krw: INITIAL_USD_TO_KRW }
    }

    pub fn quote(&self, ticker: &str) -> Option<&Quote> {
        self.quotes.get(ticker)
    }

    pub fn usd_to_krw(&self) -> f64 {
        self.usd_to_krw
    }

    pub fn to_krw(&self, usd: f64) -> f64 {
        usd * self.usd_to_krw
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    /// Perturb the quotes for the given tickers: a uniform change in
    /// [-5%, +5%] per price, floored at one cent, with change metrics
    /// rounded to two decimals. Unknown tickers are left unchanged. Also
    /// perturbs the exchange rate by a uniform change in [-2%, +2%],
    /// floored at the minimum rate. Always succeeds; returns the number
    /// of quotes updated.
    pub fn refresh<R: Rng>(&mut self, rng: &mut R, tickers: &[&str]) -> usize {
        let mut updated = 0;
        for ticker in tickers {
            if let Some(quote) = self.quotes.get_mut(*ticker) {
                let change_percent = rng.gen_range(-5.0..=5.0);
                let old_price = quote.current_price;
                let new_price = old_price * (1.0 + change_percent / 100.0);

                quote.previous_price = old_price;
                quote.current_price = round2(new_price).max(MIN_PRICE);
                quote.price_change = round2(new_price - old_price);
                quote.price_change_percent = round2(change_percent);
                updated += 1;
            }
        }

        let fx_change_percent = rng.gen_range(-2.0..=2.0);
        let new_rate = self.usd_to_krw * (1.0 + fx_change_percent / 100.0);
        self.usd_to_krw = new_rate.round().max(MIN_FX_RATE);

        updated
    }

    /// Refresh every known ticker.
    pub fn refresh_all<R: Rng>(&mut self, rng: &mut R) -> usize {
        let tickers: Vec<String> = self.quotes.keys().cloned().collect();
        let refs: Vec<&str> = tickers.iter().map(String::as_str).collect();
        self.refresh(rng, &refs)
    }

    /// Every holding whose ticker has a quote inherits the new price and
    /// change metrics.
    pub fn apply_to(&self, holdings: &mut [Holding]) {
        for holding in holdings {
            if let Some(quote) = self.quotes.get(&holding.ticker) {
                holding.previous_price = holding.current_price;
                holding.current_price = quote.current_price;
                holding.price_change = quote.price_change;
                holding.price_change_percent = quote.price_change_percent;
            }
        }
    }
}

impl Default for MarketData {
    fn default() -> Self {
        Self::from_catalog()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
