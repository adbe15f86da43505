//! Duplicate-request warnings as reported by the server

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::RequestId;

/// Lifecycle status of an existing material request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Fulfilled,
    #[serde(other)]
    Unknown,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "Draft",
            RequestStatus::Submitted => "Submitted",
            RequestStatus::UnderReview => "Under review",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Fulfilled => "Fulfilled",
            RequestStatus::Unknown => "Unknown",
        }
    }
}

/// One existing request that overlaps the one being submitted.
///
/// Produced entirely by the server; the frontend passes every field through
/// untouched and only formats it for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateWarning {
    pub request_id: RequestId,
    pub request_title: String,
    #[serde(default)]
    pub boq_reference_code: Option<String>,
    pub planned_start_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub overlapping_materials: Vec<String>,
    pub timeline_overlap_percentage: f64,
    pub status: RequestStatus,
    #[serde(default)]
    pub site_name: Option<String>,
}

impl DuplicateWarning {
    /// Overlap rendered with zero decimal places, e.g. "67%"
    pub fn overlap_label(&self) -> String {
        format!("{:.0}%", self.timeline_overlap_percentage)
    }

    /// "2025-01-05 → 2025-02-10", with "?" for a missing end
    pub fn timeline_label(&self) -> String {
        let show = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "?".to_string());
        format!("{} → {}", show(self.planned_start_date), show(self.planned_end_date))
    }
}
