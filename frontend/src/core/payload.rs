//! Project create/update payload assembled from the wizard form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{ContractType, Currency, Industry, ProjectType};

use crate::core::currency::CurrencyConverter;
use crate::core::form::WizardFormState;
use crate::core::sites::InitialSitePayload;

/// Body of `createProject` / `updateProject`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    pub code: Option<String>,
    pub industry: Option<Industry>,
    pub project_type: Option<ProjectType>,
    /// Always TZS; the display currency is only used for conversion
    pub currency: Currency,
    pub budget_total: f64,
    pub region: String,
    pub district: String,
    pub ward: String,
    pub plot_number: String,
    pub gps_coordinates: Option<String>,
    pub site_access_notes: String,
    pub title_deed_available: bool,
    /// Legacy duplicate of `gps_coordinates`
    pub site_location: Option<String>,
    pub owner_rep_name: String,
    pub owner_rep_contact: String,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub contract_type: ContractType,
    pub defects_liability_period: u32,
    pub performance_security_required: bool,
    pub description: String,
    pub key_objectives: String,
    pub expected_output: String,
    pub initial_sites: Vec<InitialSitePayload>,
}

impl ProjectPayload {
    pub fn from_form(form: &WizardFormState, converter: &CurrencyConverter) -> Self {
        let gps = form.gps_coordinates.map(|c| c.to_string());
        let code = form.code.trim();

        Self {
            name: form.name.trim().to_string(),
            code: (!code.is_empty()).then(|| code.to_string()),
            industry: form.industry,
            project_type: form.project_type,
            currency: Currency::Tzs,
            budget_total: converter.convert_display(&form.budget_display, form.currency),
            region: form.region.clone(),
            district: form.district.clone(),
            ward: form.ward.clone(),
            plot_number: form.plot_number.trim().to_string(),
            gps_coordinates: gps.clone(),
            site_access_notes: form.site_access_notes.clone(),
            title_deed_available: form.title_deed_available,
            site_location: gps,
            owner_rep_name: form.owner_rep_name.trim().to_string(),
            owner_rep_contact: form.owner_rep_contact.trim().to_string(),
            start_date: form.start_date,
            expected_completion_date: form.expected_completion_date,
            contract_type: form.contract_type,
            defects_liability_period: form.defects_liability_period,
            performance_security_required: form.performance_security_required,
            description: form.description.clone(),
            key_objectives: form.key_objectives.clone(),
            expected_output: form.expected_output.clone(),
            initial_sites: form.initial_sites.to_payload(&form.ward, &form.district),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Coordinates;

    fn converter_at(rate: f64) -> CurrencyConverter {
        let mut converter = CurrencyConverter::default();
        let ticket = converter.begin_refresh();
        converter.complete_refresh(ticket, rate);
        converter
    }

    #[test]
    fn test_usd_budget_submits_as_tzs() {
        let form = WizardFormState {
            name: "Clinic".into(),
            currency: Currency::Usd,
            budget_display: "100".into(),
            ..Default::default()
        };
        let payload = ProjectPayload::from_form(&form, &converter_at(2500.0));
        assert_eq!(payload.budget_total, 250_000.0);
        assert_eq!(payload.currency, Currency::Tzs);

        let blank = WizardFormState { budget_display: "".into(), currency: Currency::Usd, ..form };
        assert_eq!(ProjectPayload::from_form(&blank, &converter_at(2500.0)).budget_total, 0.0);
    }

    #[test]
    fn test_gps_is_mirrored_into_site_location() {
        let form = WizardFormState {
            gps_coordinates: Some(Coordinates::new(-6.7488, 39.2745)),
            ..Default::default()
        };
        let payload = ProjectPayload::from_form(&form, &CurrencyConverter::default());
        assert_eq!(payload.gps_coordinates.as_deref(), Some("-6.748800,39.274500"));
        assert_eq!(payload.site_location, payload.gps_coordinates);
    }

    #[test]
    fn test_payload_field_set_is_exact() {
        let payload = ProjectPayload::from_form(&WizardFormState::default(), &CurrencyConverter::default());
        let json = serde_json::to_value(&payload).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        let mut expected = vec![
            "name", "code", "industry", "projectType", "currency", "budgetTotal", "region", "district", "ward",
            "plotNumber", "gpsCoordinates", "siteAccessNotes", "titleDeedAvailable", "siteLocation",
            "ownerRepName", "ownerRepContact", "startDate", "expectedCompletionDate", "contractType",
            "defectsLiabilityPeriod", "performanceSecurityRequired", "description", "keyObjectives",
            "expectedOutput", "initialSites",
        ];
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(json["currency"], "TZS");
        assert_eq!(json["code"], serde_json::Value::Null);
    }
}
