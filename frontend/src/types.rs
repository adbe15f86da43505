//! Records exchanged with the remote procurement API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{
    AssignmentId, ContractType, Currency, DuplicateWarning, Industry, ProjectId, ProjectRole, ProjectType,
    RequestId, ResponsibilityLevel, SiteId, SystemRole, UserId,
};

/// Project as returned by `getProjectById`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub code: Option<String>,
    pub industry: Option<Industry>,
    pub project_type: Option<ProjectType>,
    pub currency: Currency,
    pub budget_total: Option<f64>,
    pub region: String,
    pub district: String,
    pub ward: String,
    pub plot_number: Option<String>,
    pub gps_coordinates: Option<String>,
    pub site_access_notes: Option<String>,
    pub title_deed_available: bool,
    pub owner_rep_name: Option<String>,
    pub owner_rep_contact: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub contract_type: Option<ContractType>,
    pub defects_liability_period: Option<u32>,
    pub performance_security_required: bool,
    pub description: Option<String>,
    pub key_objectives: Option<String>,
    pub expected_output: Option<String>,
}

/// Entry of `getAllProjects`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub id: SiteId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub budget_cap: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gps_center: Option<String>,
}

/// Body of `createSite` / `updateSite`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePayload {
    pub project_id: ProjectId,
    pub name: String,
    pub budget_cap: f64,
    pub location: String,
    pub gps_center: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub user_name: String,
    pub role: ProjectRole,
    #[serde(default)]
    pub responsibility_level: ResponsibilityLevel,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Body of `addTeamMember`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPayload {
    pub user_id: UserId,
    pub role: ProjectRole,
    pub responsibility_level: ResponsibilityLevel,
    pub start_date: NaiveDate,
}

/// Body of `updateTeamMember`; the user/role pairing is fixed once assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberUpdate {
    pub responsibility_level: ResponsibilityLevel,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: SystemRole,
    /// Professional registration number (engineers' registration board)
    #[serde(default)]
    pub erb_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl UserSummary {
    pub fn has_registration(&self) -> bool {
        self.erb_number.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// Body of `createProjectUser`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPayload {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: SystemRole,
    pub erb_number: Option<String>,
}

/// Body of `updateUser`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdatePayload {
    pub full_name: String,
    pub phone: Option<String>,
    pub role: SystemRole,
    pub erb_number: Option<String>,
}

/// Arguments of `assignUserToProject`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAssignmentRequest {
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub role: ProjectRole,
    pub start_date: NaiveDate,
    pub responsibility_level: ResponsibilityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Material request about to be submitted for a project site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequestDraft {
    pub project_id: ProjectId,
    #[serde(default)]
    pub site_id: Option<SiteId>,
    pub title: String,
    #[serde(default)]
    pub boq_reference_code: Option<String>,
    pub planned_start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub items: Vec<MaterialLine>,
    /// Human-written reason for proceeding despite detected duplicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_justification: Option<String>,
}

/// Server verdict on a material request submission
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSubmission {
    Accepted { request_id: RequestId },
    DuplicatesFound { warnings: Vec<DuplicateWarning> },
}
