//! Procurement frontend core
//!
//! Headless state machines for the project wizard, site list, duplicate
//! request resolution and team assignment, plus the HTTP services and screen
//! controllers that drive them against the procurement API.

pub mod config;
pub mod core;
pub mod error;
pub mod screens;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::FrontendConfig;
pub use core::{
    DuplicateConflictResolver, SiteList, TeamAssignmentEditor, UserMessage, WizardFormState, WizardStateMachine,
    WizardStep,
};
pub use error::{FrontendError, FrontendResult};
pub use traits::{ExchangeRateSource, GeocodingGateway, ProjectApi, RequestApi, SiteApi, TeamApi, UserApi};
