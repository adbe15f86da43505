//! Project wizard form record and per-field error map

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{ContractType, Coordinates, Currency, Industry, ProjectType};

use crate::core::sites::{SiteEntry, SiteList};
use crate::types::{ProjectRecord, SiteRecord};

/// Every value the wizard collects, across all steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardFormState {
    // Identity
    pub name: String,
    pub code: String,
    pub industry: Option<Industry>,
    pub project_type: Option<ProjectType>,
    pub currency: Currency,
    pub budget_display: String,
    pub description: String,

    // Location
    pub region: String,
    pub district: String,
    pub ward: String,
    pub plot_number: String,
    pub gps_coordinates: Option<Coordinates>,
    pub site_access_notes: String,
    pub title_deed_available: bool,

    // Owner, timeline, contract
    pub owner_rep_name: String,
    pub owner_rep_contact: String,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub contract_type: ContractType,
    pub defects_liability_period: u32,
    pub performance_security_required: bool,

    // Context
    pub key_objectives: String,
    pub expected_output: String,

    pub initial_sites: SiteList,
}

/// Names of the scalar form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Code,
    Industry,
    ProjectType,
    Currency,
    BudgetDisplay,
    Description,
    Region,
    District,
    Ward,
    PlotNumber,
    GpsCoordinates,
    SiteAccessNotes,
    TitleDeedAvailable,
    OwnerRepName,
    OwnerRepContact,
    StartDate,
    ExpectedCompletionDate,
    ContractType,
    DefectsLiabilityPeriod,
    PerformanceSecurityRequired,
    KeyObjectives,
    ExpectedOutput,
    InitialSites,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Code => "code",
            FormField::Industry => "industry",
            FormField::ProjectType => "projectType",
            FormField::Currency => "currency",
            FormField::BudgetDisplay => "budgetDisplay",
            FormField::Description => "description",
            FormField::Region => "region",
            FormField::District => "district",
            FormField::Ward => "ward",
            FormField::PlotNumber => "plotNumber",
            FormField::GpsCoordinates => "gpsCoordinates",
            FormField::SiteAccessNotes => "siteAccessNotes",
            FormField::TitleDeedAvailable => "titleDeedAvailable",
            FormField::OwnerRepName => "ownerRepName",
            FormField::OwnerRepContact => "ownerRepContact",
            FormField::StartDate => "startDate",
            FormField::ExpectedCompletionDate => "expectedCompletionDate",
            FormField::ContractType => "contractType",
            FormField::DefectsLiabilityPeriod => "defectsLiabilityPeriod",
            FormField::PerformanceSecurityRequired => "performanceSecurityRequired",
            FormField::KeyObjectives => "keyObjectives",
            FormField::ExpectedOutput => "expectedOutput",
            FormField::InitialSites => "initialSites",
        }
    }

    pub fn is_geography(&self) -> bool {
        matches!(self, FormField::Region | FormField::District | FormField::Ward)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user edit, carrying the new value with its proper type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Name(String),
    Code(String),
    Industry(Option<Industry>),
    ProjectType(Option<ProjectType>),
    Currency(Currency),
    BudgetDisplay(String),
    Description(String),
    Region(String),
    District(String),
    Ward(String),
    PlotNumber(String),
    GpsCoordinates(Option<Coordinates>),
    SiteAccessNotes(String),
    TitleDeedAvailable(bool),
    OwnerRepName(String),
    OwnerRepContact(String),
    StartDate(Option<NaiveDate>),
    ExpectedCompletionDate(Option<NaiveDate>),
    ContractType(ContractType),
    DefectsLiabilityPeriod(u32),
    PerformanceSecurityRequired(bool),
    KeyObjectives(String),
    ExpectedOutput(String),
}

impl FieldChange {
    pub fn field(&self) -> FormField {
        match self {
            FieldChange::Name(_) => FormField::Name,
            FieldChange::Code(_) => FormField::Code,
            FieldChange::Industry(_) => FormField::Industry,
            FieldChange::ProjectType(_) => FormField::ProjectType,
            FieldChange::Currency(_) => FormField::Currency,
            FieldChange::BudgetDisplay(_) => FormField::BudgetDisplay,
            FieldChange::Description(_) => FormField::Description,
            FieldChange::Region(_) => FormField::Region,
            FieldChange::District(_) => FormField::District,
            FieldChange::Ward(_) => FormField::Ward,
            FieldChange::PlotNumber(_) => FormField::PlotNumber,
            FieldChange::GpsCoordinates(_) => FormField::GpsCoordinates,
            FieldChange::SiteAccessNotes(_) => FormField::SiteAccessNotes,
            FieldChange::TitleDeedAvailable(_) => FormField::TitleDeedAvailable,
            FieldChange::OwnerRepName(_) => FormField::OwnerRepName,
            FieldChange::OwnerRepContact(_) => FormField::OwnerRepContact,
            FieldChange::StartDate(_) => FormField::StartDate,
            FieldChange::ExpectedCompletionDate(_) => FormField::ExpectedCompletionDate,
            FieldChange::ContractType(_) => FormField::ContractType,
            FieldChange::DefectsLiabilityPeriod(_) => FormField::DefectsLiabilityPeriod,
            FieldChange::PerformanceSecurityRequired(_) => FormField::PerformanceSecurityRequired,
            FieldChange::KeyObjectives(_) => FormField::KeyObjectives,
            FieldChange::ExpectedOutput(_) => FormField::ExpectedOutput,
        }
    }
}

/// Field name → message, rebuilt on every validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap(BTreeMap<FormField, String>);

impl FieldErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn extend(&mut self, other: FieldErrorMap) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<FormField> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl WizardFormState {
    /// Writes one change into the record, clearing geography below the
    /// changed level. Returns true when the value actually changed.
    pub fn apply(&mut self, change: FieldChange) -> bool {
        fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match change {
            FieldChange::Name(v) => set(&mut self.name, v),
            FieldChange::Code(v) => set(&mut self.code, v),
            FieldChange::Industry(v) => set(&mut self.industry, v),
            FieldChange::ProjectType(v) => set(&mut self.project_type, v),
            FieldChange::Currency(v) => set(&mut self.currency, v),
            FieldChange::BudgetDisplay(v) => set(&mut self.budget_display, v),
            FieldChange::Description(v) => set(&mut self.description, v),
            FieldChange::Region(v) => {
                let changed = set(&mut self.region, v);
                if changed {
                    self.district.clear();
                    self.ward.clear();
                }
                changed
            }
            FieldChange::District(v) => {
                let changed = set(&mut self.district, v);
                if changed {
                    self.ward.clear();
                }
                changed
            }
            FieldChange::Ward(v) => set(&mut self.ward, v),
            FieldChange::PlotNumber(v) => set(&mut self.plot_number, v),
            FieldChange::GpsCoordinates(v) => set(&mut self.gps_coordinates, v),
            FieldChange::SiteAccessNotes(v) => set(&mut self.site_access_notes, v),
            FieldChange::TitleDeedAvailable(v) => set(&mut self.title_deed_available, v),
            FieldChange::OwnerRepName(v) => set(&mut self.owner_rep_name, v),
            FieldChange::OwnerRepContact(v) => set(&mut self.owner_rep_contact, v),
            FieldChange::StartDate(v) => set(&mut self.start_date, v),
            FieldChange::ExpectedCompletionDate(v) => set(&mut self.expected_completion_date, v),
            FieldChange::ContractType(v) => set(&mut self.contract_type, v),
            FieldChange::DefectsLiabilityPeriod(v) => set(&mut self.defects_liability_period, v),
            FieldChange::PerformanceSecurityRequired(v) => set(&mut self.performance_security_required, v),
            FieldChange::KeyObjectives(v) => set(&mut self.key_objectives, v),
            FieldChange::ExpectedOutput(v) => set(&mut self.expected_output, v),
        }
    }

    /// Rebuilds the form from a fetched project and its sites (edit mode).
    ///
    /// The stored budget is already in TZS, so it is shown in TZS.
    pub fn from_record(project: &ProjectRecord, sites: &[SiteRecord]) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let entries = sites
            .iter()
            .map(|s| SiteEntry {
                id: Some(s.id),
                name: s.name.clone(),
                budget_cap: s.budget_cap.map(format_amount).unwrap_or_default(),
                location: text(&s.location),
                gps_center: text(&s.gps_center),
            })
            .collect();

        Self {
            name: project.name.clone(),
            code: text(&project.code),
            industry: project.industry,
            project_type: project.project_type,
            currency: Currency::Tzs,
            budget_display: project.budget_total.map(format_amount).unwrap_or_default(),
            description: text(&project.description),
            region: project.region.clone(),
            district: project.district.clone(),
            ward: project.ward.clone(),
            plot_number: text(&project.plot_number),
            gps_coordinates: project.gps_coordinates.as_deref().and_then(|g| g.parse().ok()),
            site_access_notes: text(&project.site_access_notes),
            title_deed_available: project.title_deed_available,
            owner_rep_name: text(&project.owner_rep_name),
            owner_rep_contact: text(&project.owner_rep_contact),
            start_date: project.start_date,
            expected_completion_date: project.expected_completion_date,
            contract_type: project.contract_type.unwrap_or_default(),
            defects_liability_period: project.defects_liability_period.unwrap_or_default(),
            performance_security_required: project.performance_security_required,
            key_objectives: text(&project.key_objectives),
            expected_output: text(&project.expected_output),
            initial_sites: SiteList::from_entries(entries),
        }
    }
}

/// Renders stored amounts without a trailing ".0" for whole numbers
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ProjectId, SiteId};

    #[test]
    fn test_region_change_clears_lower_levels() {
        let mut form = WizardFormState {
            region: "Dar es Salaam".into(),
            district: "Kinondoni".into(),
            ward: "Msasani".into(),
            ..Default::default()
        };

        assert!(form.apply(FieldChange::Region("Arusha".into())));
        assert_eq!(form.district, "");
        assert_eq!(form.ward, "");
    }

    #[test]
    fn test_district_change_clears_ward_only() {
        let mut form = WizardFormState {
            region: "Dar es Salaam".into(),
            district: "Kinondoni".into(),
            ward: "Msasani".into(),
            ..Default::default()
        };

        assert!(form.apply(FieldChange::District("Ilala".into())));
        assert_eq!(form.region, "Dar es Salaam");
        assert_eq!(form.ward, "");
    }

    #[test]
    fn test_reselecting_same_region_keeps_children() {
        let mut form = WizardFormState {
            region: "Dar es Salaam".into(),
            district: "Kinondoni".into(),
            ..Default::default()
        };

        assert!(!form.apply(FieldChange::Region("Dar es Salaam".into())));
        assert_eq!(form.district, "Kinondoni");
    }

    #[test]
    fn test_error_map_per_field_clear() {
        let mut errors = FieldErrorMap::new();
        errors.insert(FormField::Name, "required");
        errors.insert(FormField::Industry, "required");
        errors.clear_field(FormField::Name);

        assert_eq!(errors.fields(), vec![FormField::Industry]);
        assert_eq!(errors.get(FormField::Industry), Some("required"));
    }

    #[test]
    fn test_from_record_hydrates_sites_and_budget() {
        let project = ProjectRecord {
            id: ProjectId::new(),
            name: "Clinic".into(),
            budget_total: Some(250_000.0),
            gps_coordinates: Some("-6.7488,39.2745".into()),
            region: "Dar es Salaam".into(),
            ..Default::default()
        };
        let site = SiteRecord {
            id: SiteId::new(),
            project_id: project.id,
            name: "Main".into(),
            budget_cap: Some(1200.5),
            location: None,
            gps_center: None,
        };

        let form = WizardFormState::from_record(&project, &[site.clone()]);
        assert_eq!(form.budget_display, "250000");
        assert_eq!(form.currency, Currency::Tzs);
        assert_eq!(form.gps_coordinates, Some(Coordinates::new(-6.7488, 39.2745)));
        assert_eq!(form.initial_sites.default_site().id, Some(site.id));
        assert_eq!(form.initial_sites.default_site().budget_cap, "1200.5");

        let empty = WizardFormState::from_record(&project, &[]);
        assert_eq!(empty.initial_sites.len(), 1);
    }
}
