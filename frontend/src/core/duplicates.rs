//! Justification checkpoint shown when the server reports overlapping requests

use shared::DuplicateWarning;

/// One rendered line of the conflict dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRow {
    pub title: String,
    pub reference: String,
    pub site: String,
    pub timeline: String,
    pub overlap: String,
    pub status: String,
    pub materials: String,
}

impl From<&DuplicateWarning> for ConflictRow {
    fn from(warning: &DuplicateWarning) -> Self {
        Self {
            title: warning.request_title.clone(),
            reference: warning.boq_reference_code.clone().unwrap_or_else(|| "-".to_string()),
            site: warning.site_name.clone().unwrap_or_else(|| "-".to_string()),
            timeline: warning.timeline_label(),
            overlap: warning.overlap_label(),
            status: warning.status.label().to_string(),
            materials: warning.overlapping_materials.join(", "),
        }
    }
}

/// Holds the server's warnings and the user's explanation until the user
/// confirms or cancels. Cancelling is dropping the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateConflictResolver {
    warnings: Vec<DuplicateWarning>,
    explanation: String,
}

impl DuplicateConflictResolver {
    pub fn open(warnings: Vec<DuplicateWarning>) -> Self {
        Self { warnings, explanation: String::new() }
    }

    pub fn warnings(&self) -> &[DuplicateWarning] {
        &self.warnings
    }

    pub fn rows(&self) -> Vec<ConflictRow> {
        self.warnings.iter().map(ConflictRow::from).collect()
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn set_explanation(&mut self, text: impl Into<String>) {
        self.explanation = text.into();
    }

    pub fn can_confirm(&self) -> bool {
        !self.explanation.trim().is_empty()
    }

    /// Hands the explanation, exactly as typed, to `resubmit`. Returns false
    /// without calling it when the explanation is blank.
    pub fn confirm<F>(&self, resubmit: F) -> bool
    where
        F: FnOnce(String),
    {
        if !self.can_confirm() {
            return false;
        }
        resubmit(self.explanation.clone());
        true
    }

    /// Discards the warnings and the explanation
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{RequestId, RequestStatus};

    fn warning() -> DuplicateWarning {
        DuplicateWarning {
            request_id: RequestId::new(),
            request_title: "Cement for slab".into(),
            boq_reference_code: Some("BOQ-12".into()),
            planned_start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            planned_end_date: None,
            overlapping_materials: vec!["Cement".into(), "Sand".into()],
            timeline_overlap_percentage: 66.6,
            status: RequestStatus::Submitted,
            site_name: None,
        }
    }

    #[test]
    fn test_blank_explanation_never_reaches_callback() {
        let mut resolver = DuplicateConflictResolver::open(vec![warning()]);
        let mut called = false;
        assert!(!resolver.confirm(|_| called = true));
        assert!(!called);

        resolver.set_explanation("   \t");
        assert!(!resolver.confirm(|_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_confirm_passes_exact_explanation() {
        let mut resolver = DuplicateConflictResolver::open(vec![warning()]);
        resolver.set_explanation("Scope change");
        let mut received = None;
        assert!(resolver.confirm(|text| received = Some(text)));
        assert_eq!(received.as_deref(), Some("Scope change"));
    }

    #[test]
    fn test_rows_pass_server_values_through() {
        let resolver = DuplicateConflictResolver::open(vec![warning()]);
        let rows = resolver.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].overlap, "67%");
        assert_eq!(rows[0].materials, "Cement, Sand");
        assert_eq!(rows[0].site, "-");
        assert_eq!(rows[0].reference, "BOQ-12");
    }
}
