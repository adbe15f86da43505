//! Service tests
//!
//! HTTP services run against wiremock servers; each service has its own file.
