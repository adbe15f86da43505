//! Shared vocabulary for the procurement frontend
//!
//! Contains the types that every screen and service agrees on: identifiers,
//! enumerations mirrored from the remote API, the static geography table,
//! duplicate-request warnings and the transport failure taxonomy.

pub mod types;
pub mod errors;
pub mod geo;
pub mod duplicates;
pub mod logging;

pub use types::*;
pub use errors::*;

pub use geo::{District, GeoHierarchy, GeoLevel, Region, Ward, geocode_query, DEFAULT_COUNTRY};
pub use duplicates::{DuplicateWarning, RequestStatus};
pub use logging::ComponentId;
