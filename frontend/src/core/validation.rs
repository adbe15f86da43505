//! Step-scoped validation of the wizard form

use shared::GeoHierarchy;

use crate::core::currency::parse_amount;
use crate::core::form::{FieldErrorMap, FormField, WizardFormState};
use crate::core::machine::WizardStep;

/// Validates only the fields owned by `step`. Steps without required
/// fields always pass.
pub fn validate_step(form: &WizardFormState, step: WizardStep) -> FieldErrorMap {
    let mut errors = FieldErrorMap::new();
    let blank = |s: &str| s.trim().is_empty();

    match step {
        WizardStep::Identity => {
            if blank(&form.name) {
                errors.insert(FormField::Name, "Project name is required");
            }
            if form.industry.is_none() {
                errors.insert(FormField::Industry, "Industry is required");
            }
            if form.project_type.is_none() {
                errors.insert(FormField::ProjectType, "Project type is required");
            }
            if parse_amount(&form.budget_display).is_some_and(|b| b < 0.0) {
                errors.insert(FormField::BudgetDisplay, "Budget cannot be negative");
            }
        }
        WizardStep::Location => {
            if blank(&form.region) {
                errors.insert(FormField::Region, "Region is required");
            }
            if blank(&form.district) {
                errors.insert(FormField::District, "District is required");
            }
            if blank(&form.ward) {
                errors.insert(FormField::Ward, "Ward is required");
            }
            check_geography(form, &mut errors);

            let bad_caps = form.initial_sites.invalid_budget_caps();
            if !bad_caps.is_empty() {
                let sites: Vec<String> = bad_caps.iter().map(|i| (i + 1).to_string()).collect();
                errors.insert(
                    FormField::InitialSites,
                    format!("Budget cap must be a non-negative amount (site {})", sites.join(", ")),
                );
            }
        }
        WizardStep::OwnerTimelineContract => {
            if form.start_date.is_none() {
                errors.insert(FormField::StartDate, "Start date is required");
            }
            match (form.start_date, form.expected_completion_date) {
                (_, None) => {
                    errors.insert(FormField::ExpectedCompletionDate, "Expected completion date is required");
                }
                (Some(start), Some(end)) if start >= end => {
                    errors.insert(
                        FormField::ExpectedCompletionDate,
                        "Expected completion date must be after the start date",
                    );
                }
                _ => {}
            }
        }
        WizardStep::Context | WizardStep::Review => {}
    }

    errors
}

/// Flags the first selected level that is not a child of its parent.
/// Hydrated records and saved drafts never went through the edit checks.
fn check_geography(form: &WizardFormState, errors: &mut FieldErrorMap) {
    let geo = GeoHierarchy::tanzania();
    let levels = [
        (FormField::Region, geo.check_selection(&form.region, "", "")),
        (FormField::District, geo.check_selection(&form.region, &form.district, "")),
        (FormField::Ward, geo.check_selection(&form.region, &form.district, &form.ward)),
    ];
    if let Some((field, Err(e))) = levels.into_iter().find(|(_, checked)| checked.is_err()) {
        errors.insert(field, e.to_string());
    }
}

/// Steps re-checked before submission
pub const SUBMIT_CHECKED_STEPS: [WizardStep; 3] =
    [WizardStep::Identity, WizardStep::Location, WizardStep::OwnerTimelineContract];

/// Validates every step checked at submission, returning the failing steps
/// alongside the merged error map
pub fn validate_for_submit(form: &WizardFormState) -> (Vec<WizardStep>, FieldErrorMap) {
    let mut failing = Vec::new();
    let mut merged = FieldErrorMap::new();
    for step in SUBMIT_CHECKED_STEPS {
        let errors = validate_step(form, step);
        if !errors.is_empty() {
            failing.push(step);
            merged.extend(errors);
        }
    }
    (failing, merged)
}
