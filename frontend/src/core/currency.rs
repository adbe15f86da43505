//! Conversion of display budgets into the storage currency (TZS)

use chrono::{DateTime, Utc};
use shared::Currency;

use crate::core::sequencer::{RequestGroup, RequestSequencer, Ticket};

/// Rate used until the first successful fetch
pub const DEFAULT_USD_TZS_RATE: f64 = 2500.0;

/// Parses user-typed amounts such as "1,250,000" or " 42.5 ".
///
/// Returns `None` for blank or non-numeric text.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Holds the most recently fetched USD→TZS rate
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    usd_to_tzs: f64,
    fetched_at: Option<DateTime<Utc>>,
    sequencer: RequestSequencer,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(DEFAULT_USD_TZS_RATE)
    }
}

impl CurrencyConverter {
    pub fn new(initial_rate: f64) -> Self {
        Self {
            usd_to_tzs: initial_rate,
            fetched_at: None,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn rate(&self) -> f64 {
        self.usd_to_tzs
    }

    /// When the current rate was fetched; `None` while still on the default
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Start a refresh; only the newest refresh may land
    pub fn begin_refresh(&mut self) -> Ticket {
        self.sequencer.issue(RequestGroup::ExchangeRate)
    }

    /// Apply a fetched rate. Stale tickets and non-positive rates are ignored.
    pub fn complete_refresh(&mut self, ticket: Ticket, rate: f64) -> bool {
        if !self.sequencer.is_current(ticket) || !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.usd_to_tzs = rate;
        self.fetched_at = Some(Utc::now());
        true
    }

    pub fn to_tzs(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Tzs => amount,
            Currency::Usd => amount * self.usd_to_tzs,
        }
    }

    /// Converts the budget text as typed; blank or non-numeric text is zero
    pub fn convert_display(&self, display: &str, currency: Currency) -> f64 {
        parse_amount(display).map(|v| self.to_tzs(v, currency)).unwrap_or(0.0)
    }
}
