//! Geocoding gateways
//!
//! [`RealGeocodingGateway`] queries a Nominatim-compatible search endpoint.
//! [`StaticGeocodingGateway`] answers from the built-in geography table and
//! is used offline.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use shared::{component_debug, component_warn, ComponentId, Coordinates, GeoHierarchy};

use crate::traits::GeocodingGateway;

const USER_AGENT: &str = concat!("procurement-frontend/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Clone)]
pub struct RealGeocodingGateway {
    search_url: Url,
    client: reqwest::Client,
}

impl RealGeocodingGateway {
    pub fn new(search_url: Url) -> Self {
        Self { search_url, client: reqwest::Client::new() }
    }

    async fn search(&self, query: &str) -> Result<Option<Coordinates>, String> {
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let hits: Vec<SearchHit> = response.json().await.map_err(|e| e.to_string())?;
        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        let lat = hit.lat.trim().parse::<f64>().map_err(|e| format!("bad lat {}: {e}", hit.lat))?;
        let lng = hit.lon.trim().parse::<f64>().map_err(|e| format!("bad lon {}: {e}", hit.lon))?;
        Ok(Some(Coordinates::new(lat, lng)))
    }
}

#[async_trait]
impl GeocodingGateway for RealGeocodingGateway {
    async fn geocode(&self, query: &str) -> Option<Coordinates> {
        match self.search(query).await {
            Ok(found) => {
                component_debug!(ComponentId::Geocoder, "{} -> {:?}", query, found);
                found
            }
            Err(reason) => {
                component_warn!(ComponentId::Geocoder, "lookup for '{}' failed: {}", query, reason);
                None
            }
        }
    }
}

/// Resolves "ward, district, region, country" queries from the built-in table
#[derive(Clone, Copy, Default)]
pub struct StaticGeocodingGateway {
    hierarchy: GeoHierarchy,
}

impl StaticGeocodingGateway {
    pub fn new(hierarchy: GeoHierarchy) -> Self {
        Self { hierarchy }
    }

    pub fn resolve(&self, query: &str) -> Option<Coordinates> {
        let mut parts: Vec<&str> = query.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        // Drop the trailing country qualifier
        if parts.len() > 1 && self.hierarchy.region(parts[parts.len() - 1]).is_none() {
            parts.pop();
        }
        parts.reverse();
        match parts.as_slice() {
            [region] => self.hierarchy.locate(region, "", ""),
            [region, district] => self.hierarchy.locate(region, district, ""),
            [region, district, ward] => self.hierarchy.locate(region, district, ward),
            _ => None,
        }
    }
}

#[async_trait]
impl GeocodingGateway for StaticGeocodingGateway {
    async fn geocode(&self, query: &str) -> Option<Coordinates> {
        self.resolve(query)
    }
}
