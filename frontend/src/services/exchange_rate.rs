//! Exchange-rate lookups and the background refresher

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time;
use url::Url;

use shared::{component_debug, component_warn, ComponentId, Currency};

use crate::core::currency::CurrencyConverter;
use crate::error::{FrontendError, FrontendResult};
use crate::traits::ExchangeRateSource;

/// Converter shared between the refresher task and the screens
pub type SharedConverter = Arc<RwLock<CurrencyConverter>>;

#[derive(Deserialize, Debug)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Reads `{base_url}/{FROM}` and picks `rates[TO]` from the answer
#[derive(Clone)]
pub struct HttpExchangeRateSource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpExchangeRateSource {
    pub fn new(base_url: Url) -> Self {
        Self { base_url, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl ExchangeRateSource for HttpExchangeRateSource {
    async fn fetch_rate(&self, from: Currency, to: Currency) -> FrontendResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), from);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FrontendError::exchange_rate(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FrontendError::exchange_rate(format!("HTTP {} from {url}", response.status())));
        }

        let latest: LatestRates = response
            .json()
            .await
            .map_err(|e| FrontendError::exchange_rate(format!("unreadable rate table: {e}")))?;
        latest
            .rates
            .get(&to.to_string())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| FrontendError::exchange_rate(format!("no {to} rate for {from}")))
    }
}

/// Fetches once and applies the result if no newer refresh started meanwhile.
/// Returns whether the converter changed.
pub async fn refresh_once<R: ExchangeRateSource + ?Sized>(source: &R, converter: &SharedConverter) -> bool {
    let ticket = converter.write().await.begin_refresh();
    match source.fetch_rate(Currency::Usd, Currency::Tzs).await {
        Ok(rate) => {
            let applied = converter.write().await.complete_refresh(ticket, rate);
            if applied {
                component_debug!(ComponentId::Rates, "USD/TZS rate now {}", rate);
            } else {
                component_debug!(ComponentId::Rates, "discarded stale or invalid rate {}", rate);
            }
            applied
        }
        Err(e) => {
            // Keep the previous rate
            component_warn!(ComponentId::Rates, "rate refresh failed: {}", e);
            false
        }
    }
}

/// Refreshes immediately, then on every `period` until the handle is aborted
pub fn spawn_rate_refresher<R>(source: Arc<R>, converter: SharedConverter, period: Duration) -> JoinHandle<()>
where
    R: ExchangeRateSource + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;
            refresh_once(source.as_ref(), &converter).await;
        }
    })
}
