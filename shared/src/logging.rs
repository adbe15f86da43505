//! Shared logging utilities for consistent tracing across screens and services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

/// Which part of the frontend emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    Wizard,
    Sites,
    Team,
    Users,
    Requests,
    Geocoder,
    Rates,
    Api,
    Cli,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentId::Wizard => "wizard",
            ComponentId::Sites => "sites",
            ComponentId::Team => "team",
            ComponentId::Users => "users",
            ComponentId::Requests => "requests",
            ComponentId::Geocoder => "geocoder",
            ComponentId::Rates => "rates",
            ComponentId::Api => "api",
            ComponentId::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// Filter directive used for both the library crates and their HTTP stack
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("frontend={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize the stdout tracing subscriber with an optional log level
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = filter_directive(log_level);

    // try_init: tests and embedding hosts may already own the global subscriber
    let _ = fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for component-aware info logging
#[macro_export]
macro_rules! component_info {
    ($component:expr, $($arg:tt)*) => {
        tracing::info!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware warning logging
#[macro_export]
macro_rules! component_warn {
    ($component:expr, $($arg:tt)*) => {
        tracing::warn!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware error logging
#[macro_export]
macro_rules! component_error {
    ($component:expr, $($arg:tt)*) => {
        tracing::error!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware debug logging
#[macro_export]
macro_rules! component_debug {
    ($component:expr, $($arg:tt)*) => {
        tracing::debug!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: ComponentId, details: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: ComponentId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        component = %component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(component: ComponentId, message: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
