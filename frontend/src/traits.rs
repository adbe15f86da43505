//! Service trait definitions for dependency injection
//!
//! Every external collaborator the screens talk to is reached through one of
//! these traits so the state machines can be exercised against mocks.

use async_trait::async_trait;
use shared::{ApiFailure, AssignmentId, Coordinates, Currency, ProjectId, SiteId, UserId};

use crate::core::payload::ProjectPayload;
use crate::error::FrontendResult;
use crate::types::{
    MaterialRequestDraft, NewUserPayload, ProjectAssignmentRequest, ProjectRecord, ProjectSummary,
    RequestSubmission, SitePayload, SiteRecord, TeamAssignment, TeamMemberPayload, TeamMemberUpdate,
    UserSummary, UserUpdatePayload,
};

/// Free-text place lookup used to centre the map
#[mockall::automock]
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    /// `None` means no match; transport failures are reported the same way
    async fn geocode(&self, query: &str) -> Option<Coordinates>;
}

/// Source of the rate used to convert display budgets into storage currency
#[mockall::automock]
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    /// Units of `to` per one unit of `from`
    async fn fetch_rate(&self, from: Currency, to: Currency) -> FrontendResult<f64>;
}

/// Project persistence
#[mockall::automock]
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn create_project(&self, payload: &ProjectPayload) -> Result<ProjectRecord, ApiFailure>;

    async fn update_project(&self, id: ProjectId, payload: &ProjectPayload) -> Result<ProjectRecord, ApiFailure>;

    async fn get_project_by_id(&self, id: ProjectId) -> Result<ProjectRecord, ApiFailure>;

    async fn get_all_projects(&self) -> Result<Vec<ProjectSummary>, ApiFailure>;
}

/// Work-site persistence
#[mockall::automock]
#[async_trait]
pub trait SiteApi: Send + Sync {
    async fn get_sites_by_project(&self, project_id: ProjectId) -> Result<Vec<SiteRecord>, ApiFailure>;

    async fn create_site(&self, payload: &SitePayload) -> Result<SiteRecord, ApiFailure>;

    async fn update_site(&self, id: SiteId, payload: &SitePayload) -> Result<SiteRecord, ApiFailure>;

    async fn delete_site(&self, id: SiteId) -> Result<(), ApiFailure>;
}

/// Project team assignments
#[mockall::automock]
#[async_trait]
pub trait TeamApi: Send + Sync {
    async fn get_project_team(&self, project_id: ProjectId) -> Result<Vec<TeamAssignment>, ApiFailure>;

    async fn add_team_member(
        &self,
        project_id: ProjectId,
        payload: &TeamMemberPayload,
    ) -> Result<TeamAssignment, ApiFailure>;

    async fn update_team_member(
        &self,
        project_id: ProjectId,
        assignment_id: AssignmentId,
        payload: &TeamMemberUpdate,
    ) -> Result<TeamAssignment, ApiFailure>;

    async fn remove_team_member(&self, project_id: ProjectId, assignment_id: AssignmentId) -> Result<(), ApiFailure>;

    /// Candidate pool for new assignments
    async fn get_available_engineers(&self) -> Result<Vec<UserSummary>, ApiFailure>;
}

/// User administration
#[mockall::automock]
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn get_my_project_users(&self) -> Result<Vec<UserSummary>, ApiFailure>;

    async fn create_project_user(&self, payload: &NewUserPayload) -> Result<UserSummary, ApiFailure>;

    async fn assign_user_to_project(&self, request: &ProjectAssignmentRequest) -> Result<(), ApiFailure>;

    async fn update_user(&self, id: UserId, payload: &UserUpdatePayload) -> Result<UserSummary, ApiFailure>;

    async fn delete_user(&self, id: UserId) -> Result<(), ApiFailure>;

    async fn remove_user_from_project(&self, user_id: UserId, project_id: ProjectId) -> Result<(), ApiFailure>;
}

/// Material request submission, where the server runs duplicate detection
#[mockall::automock]
#[async_trait]
pub trait RequestApi: Send + Sync {
    async fn submit_material_request(&self, draft: &MaterialRequestDraft) -> Result<RequestSubmission, ApiFailure>;
}
