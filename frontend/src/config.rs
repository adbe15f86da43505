//! Runtime configuration
//!
//! Values are read from the process environment after loading a `.env` file
//! from the working directory (or a parent). CLI flags override them.
//!
//! | Variable | Default |
//! |---|---|
//! | `PROCUREMENT_API_URL` | none, required for online commands |
//! | `PROCUREMENT_API_TOKEN` | none |
//! | `GEOCODER_URL` | Nominatim search endpoint |
//! | `EXCHANGE_RATE_URL` | open exchange-rate endpoint |
//! | `EXCHANGE_RATE_REFRESH_SECS` | 3600 |
//! | `DEFAULT_USD_TZS_RATE` | 2500 |
//! | `GEOCODER_COUNTRY` | Tanzania |

use std::path::Path;
use std::time::Duration;

use shared::DEFAULT_COUNTRY;
use url::Url;

use crate::core::DEFAULT_USD_TZS_RATE;
use crate::error::{FrontendError, FrontendResult};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6/latest";
pub const DEFAULT_REFRESH_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    pub api_url: Option<Url>,
    pub api_token: Option<String>,
    pub geocoder_url: Url,
    pub exchange_rate_url: Url,
    pub rate_refresh: Duration,
    pub default_usd_tzs_rate: f64,
    pub geocoder_country: String,
}

impl FrontendConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> FrontendResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads only the given `.env` file, leaving the process environment alone
    pub fn from_env_file(path: &Path) -> FrontendResult<Self> {
        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| FrontendError::config(format!("cannot read {}: {e}", path.display())))?
            .collect::<Result<Vec<(String, String)>, _>>()
            .map_err(|e| FrontendError::config(format!("malformed {}: {e}", path.display())))?;
        Self::from_lookup(|key| entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()))
    }

    pub fn from_lookup<F>(lookup: F) -> FrontendResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get("PROCUREMENT_API_URL")
            .map(|raw| parse_url("PROCUREMENT_API_URL", &raw))
            .transpose()?;
        let geocoder_url = parse_url(
            "GEOCODER_URL",
            &get("GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
        )?;
        let exchange_rate_url = parse_url(
            "EXCHANGE_RATE_URL",
            &get("EXCHANGE_RATE_URL").unwrap_or_else(|| DEFAULT_EXCHANGE_RATE_URL.to_string()),
        )?;

        let refresh_secs = match get("EXCHANGE_RATE_REFRESH_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| FrontendError::config(format!("EXCHANGE_RATE_REFRESH_SECS must be a positive integer, got {raw}")))?,
            None => DEFAULT_REFRESH_SECS,
        };

        let default_usd_tzs_rate = match get("DEFAULT_USD_TZS_RATE") {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .ok_or_else(|| FrontendError::config(format!("DEFAULT_USD_TZS_RATE must be a positive number, got {raw}")))?,
            None => DEFAULT_USD_TZS_RATE,
        };

        Ok(Self {
            api_url,
            api_token: get("PROCUREMENT_API_TOKEN"),
            geocoder_url,
            exchange_rate_url,
            rate_refresh: Duration::from_secs(refresh_secs),
            default_usd_tzs_rate,
            geocoder_country: get("GEOCODER_COUNTRY").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        })
    }

    pub fn with_api_url(mut self, raw: &str) -> FrontendResult<Self> {
        self.api_url = Some(parse_url("--api-url", raw)?);
        Ok(self)
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// The API base URL, for commands that talk to the server
    pub fn require_api_url(&self) -> FrontendResult<&Url> {
        self.api_url
            .as_ref()
            .ok_or_else(|| FrontendError::config("PROCUREMENT_API_URL is not set"))
    }
}

fn parse_url(name: &str, raw: &str) -> FrontendResult<Url> {
    let url = Url::parse(raw).map_err(|e| FrontendError::config(format!("{name} is not a valid URL ({e}): {raw}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FrontendError::config(format!("{name} must use http or https, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = FrontendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, None);
        assert_eq!(config.geocoder_url.as_str(), DEFAULT_GEOCODER_URL);
        assert_eq!(config.rate_refresh, Duration::from_secs(3600));
        assert_eq!(config.default_usd_tzs_rate, 2500.0);
        assert_eq!(config.geocoder_country, "Tanzania");
        assert!(config.require_api_url().is_err());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = FrontendConfig::from_lookup(lookup(&[("PROCUREMENT_API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, FrontendError::Config { .. }));

        let err = FrontendConfig::from_lookup(lookup(&[("PROCUREMENT_API_URL", "ftp://files.example")])).unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = FrontendConfig::from_lookup(lookup(&[("DEFAULT_USD_TZS_RATE", "-3")])).unwrap_err();
        assert!(matches!(err, FrontendError::Config { .. }));

        let err = FrontendConfig::from_lookup(lookup(&[("EXCHANGE_RATE_REFRESH_SECS", "0")])).unwrap_err();
        assert!(matches!(err, FrontendError::Config { .. }));
    }

    #[test]
    fn test_env_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "PROCUREMENT_API_URL=https://api.example.co.tz/v1/\nPROCUREMENT_API_TOKEN=abc123\nDEFAULT_USD_TZS_RATE=2650.5\n",
        )
        .unwrap();

        let config = FrontendConfig::from_env_file(&path).unwrap();
        assert_eq!(config.require_api_url().unwrap().as_str(), "https://api.example.co.tz/v1/");
        assert_eq!(config.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.default_usd_tzs_rate, 2650.5);
    }

    #[test]
    fn test_cli_override_replaces_env_value() {
        let config = FrontendConfig::from_lookup(lookup(&[("PROCUREMENT_API_URL", "https://a.example/")]))
            .unwrap()
            .with_api_url("https://b.example/")
            .unwrap();
        assert_eq!(config.require_api_url().unwrap().host_str(), Some("b.example"));
    }
}
