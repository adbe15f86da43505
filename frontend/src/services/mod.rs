//! Service implementations
//!
//! Real implementations of the service traits, talking HTTP.

pub mod api_client;
pub mod exchange_rate;
pub mod geocoding;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use api_client::RealProcurementApi;
pub use exchange_rate::{refresh_once, spawn_rate_refresher, HttpExchangeRateSource, SharedConverter};
pub use geocoding::{RealGeocodingGateway, StaticGeocodingGateway};
