//! Variable-length list of work-site entries
//!
//! The list is a persistent value: every edit returns a new `SiteList` that
//! shares storage with the old one until it is written to. It never holds
//! fewer than one entry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::SiteId;

use crate::core::currency::parse_amount;
use crate::core::linked::fallback_site_location;

/// One site row as the user typed it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteEntry {
    /// Present only for sites that already exist on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SiteId>,
    pub name: String,
    pub budget_cap: String,
    pub location: String,
    pub gps_center: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteField {
    Name,
    BudgetCap,
    Location,
    GpsCenter,
}

/// Site as it appears in the project submission payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSitePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SiteId>,
    pub name: String,
    pub budget_cap: f64,
    pub location: String,
    pub gps_center: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SiteEntry>", into = "Vec<SiteEntry>")]
pub struct SiteList(Arc<Vec<SiteEntry>>);

impl Default for SiteList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<SiteEntry>> for SiteList {
    fn from(entries: Vec<SiteEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<SiteList> for Vec<SiteEntry> {
    fn from(list: SiteList) -> Self {
        Arc::unwrap_or_clone(list.0)
    }
}

impl SiteList {
    /// A list holding the single blank default site
    pub fn new() -> Self {
        Self(Arc::new(vec![SiteEntry::default()]))
    }

    /// Wraps existing entries, substituting a blank site for an empty list
    pub fn from_entries(entries: Vec<SiteEntry>) -> Self {
        if entries.is_empty() {
            Self::new()
        } else {
            Self(Arc::new(entries))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[SiteEntry] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&SiteEntry> {
        self.0.get(index)
    }

    /// The first entry, which tracks the project's own location
    pub fn default_site(&self) -> &SiteEntry {
        &self.0[0]
    }

    /// Whether a remove control should be enabled
    pub fn can_remove(&self) -> bool {
        self.0.len() > 1
    }

    /// Appends a blank entry
    pub fn with_added(&self) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).push(SiteEntry::default());
        next
    }

    /// Drops the entry at `index`; the last remaining entry is never dropped
    pub fn without(&self, index: usize) -> Self {
        if !self.can_remove() || index >= self.0.len() {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).remove(index);
        next
    }

    /// Replaces one field of one entry
    pub fn with_update(&self, index: usize, field: SiteField, value: impl Into<String>) -> Self {
        if index >= self.0.len() {
            return self.clone();
        }
        let mut next = self.clone();
        let entry = &mut Arc::make_mut(&mut next.0)[index];
        let value = value.into();
        match field {
            SiteField::Name => entry.name = value,
            SiteField::BudgetCap => entry.budget_cap = value,
            SiteField::Location => entry.location = value,
            SiteField::GpsCenter => entry.gps_center = value,
        }
        next
    }

    /// Identifiers of the entries that exist on the server
    pub fn persisted_ids(&self) -> Vec<SiteId> {
        self.0.iter().filter_map(|s| s.id).collect()
    }

    /// Positions of named entries whose budget cap is not a non-negative
    /// amount. Blank caps are fine.
    pub fn invalid_budget_caps(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, site)| !site.name.trim().is_empty() && !site.budget_cap.trim().is_empty())
            .filter(|(_, site)| !parse_amount(&site.budget_cap).is_some_and(|cap| cap >= 0.0))
            .map(|(index, _)| index)
            .collect()
    }

    /// Maps named entries to their submission form.
    ///
    /// Blank or unusable budget caps submit as zero and blank locations fall
    /// back to "ward, district".
    pub fn to_payload(&self, ward: &str, district: &str) -> Vec<InitialSitePayload> {
        self.0
            .iter()
            .filter(|site| !site.name.trim().is_empty())
            .map(|site| InitialSitePayload {
                id: site.id,
                name: site.name.trim().to_string(),
                budget_cap: parse_amount(&site.budget_cap).filter(|cap| *cap >= 0.0).unwrap_or(0.0),
                location: if site.location.trim().is_empty() {
                    fallback_site_location(ward, district)
                } else {
                    site.location.trim().to_string()
                },
                gps_center: Some(site.gps_center.trim())
                    .filter(|g| !g.is_empty())
                    .map(str::to_string),
            })
            .collect()
    }
}
