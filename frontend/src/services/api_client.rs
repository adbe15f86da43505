//! REST client for the procurement API
//!
//! One reqwest client implements every persistence trait. Non-2xx answers
//! are turned into [`ApiFailure`] from the status code plus the server's
//! `message` (or `error`) field when the body carries one.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use shared::{
    component_debug, ApiFailure, AssignmentId, ComponentId, DuplicateWarning, ProjectId, ProjectRole, RequestId,
    ResponsibilityLevel, SiteId, UserId,
};

use crate::core::payload::ProjectPayload;
use crate::traits::{ProjectApi, RequestApi, SiteApi, TeamApi, UserApi};
use crate::types::{
    MaterialRequestDraft, NewUserPayload, ProjectAssignmentRequest, ProjectRecord, ProjectSummary,
    RequestSubmission, SitePayload, SiteRecord, TeamAssignment, TeamMemberPayload, TeamMemberUpdate, UserSummary,
    UserUpdatePayload,
};

/// Error body shape used by the API
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreatedRequest {
    id: RequestId,
}

#[derive(Deserialize, Debug)]
struct DuplicateBody {
    #[serde(default)]
    duplicates: Vec<DuplicateWarning>,
    message: Option<String>,
}

/// Body of `POST /users/{id}/projects`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AssignmentBody {
    project_id: ProjectId,
    role: ProjectRole,
    start_date: NaiveDate,
    responsibility_level: ResponsibilityLevel,
}

#[derive(Clone)]
pub struct RealProcurementApi {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl RealProcurementApi {
    /// No request timeout is configured; calls wait for the server.
    pub fn new(base_url: Url, token: Option<String>) -> Self {
        Self { base_url, token, client: reqwest::Client::new() }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        component_debug!(ComponentId::Api, "{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiFailure> {
        let response = builder.send().await.map_err(transport_failure)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(failure_from_response(response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiFailure> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|e| ApiFailure::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiFailure> {
        self.send(builder).await.map(|_| ())
    }
}

/// Anything that never produced an HTTP status
fn transport_failure(err: reqwest::Error) -> ApiFailure {
    if err.is_decode() {
        ApiFailure::Decode(err.to_string())
    } else {
        ApiFailure::Network(err.to_string())
    }
}

async fn failure_from_response(response: Response) -> ApiFailure {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiFailure::from_status(status, error_message(&body))
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
        })
        .filter(|m| !m.trim().is_empty())
}

#[async_trait]
impl ProjectApi for RealProcurementApi {
    async fn create_project(&self, payload: &ProjectPayload) -> Result<ProjectRecord, ApiFailure> {
        self.send_json(self.request(Method::POST, "/projects").json(payload)).await
    }

    async fn update_project(&self, id: ProjectId, payload: &ProjectPayload) -> Result<ProjectRecord, ApiFailure> {
        self.send_json(self.request(Method::PUT, &format!("/projects/{id}")).json(payload)).await
    }

    async fn get_project_by_id(&self, id: ProjectId) -> Result<ProjectRecord, ApiFailure> {
        self.send_json(self.request(Method::GET, &format!("/projects/{id}"))).await
    }

    async fn get_all_projects(&self) -> Result<Vec<ProjectSummary>, ApiFailure> {
        self.send_json(self.request(Method::GET, "/projects")).await
    }
}

#[async_trait]
impl SiteApi for RealProcurementApi {
    async fn get_sites_by_project(&self, project_id: ProjectId) -> Result<Vec<SiteRecord>, ApiFailure> {
        self.send_json(self.request(Method::GET, &format!("/projects/{project_id}/sites"))).await
    }

    async fn create_site(&self, payload: &SitePayload) -> Result<SiteRecord, ApiFailure> {
        self.send_json(self.request(Method::POST, "/sites").json(payload)).await
    }

    async fn update_site(&self, id: SiteId, payload: &SitePayload) -> Result<SiteRecord, ApiFailure> {
        self.send_json(self.request(Method::PUT, &format!("/sites/{id}")).json(payload)).await
    }

    async fn delete_site(&self, id: SiteId) -> Result<(), ApiFailure> {
        self.send_empty(self.request(Method::DELETE, &format!("/sites/{id}"))).await
    }
}

#[async_trait]
impl TeamApi for RealProcurementApi {
    async fn get_project_team(&self, project_id: ProjectId) -> Result<Vec<TeamAssignment>, ApiFailure> {
        self.send_json(self.request(Method::GET, &format!("/projects/{project_id}/team"))).await
    }

    async fn add_team_member(
        &self,
        project_id: ProjectId,
        payload: &TeamMemberPayload,
    ) -> Result<TeamAssignment, ApiFailure> {
        self.send_json(self.request(Method::POST, &format!("/projects/{project_id}/team")).json(payload))
            .await
    }

    async fn update_team_member(
        &self,
        project_id: ProjectId,
        assignment_id: AssignmentId,
        payload: &TeamMemberUpdate,
    ) -> Result<TeamAssignment, ApiFailure> {
        let path = format!("/projects/{project_id}/team/{assignment_id}");
        self.send_json(self.request(Method::PUT, &path).json(payload)).await
    }

    async fn remove_team_member(&self, project_id: ProjectId, assignment_id: AssignmentId) -> Result<(), ApiFailure> {
        let path = format!("/projects/{project_id}/team/{assignment_id}");
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn get_available_engineers(&self) -> Result<Vec<UserSummary>, ApiFailure> {
        self.send_json(self.request(Method::GET, "/users/available-engineers")).await
    }
}

#[async_trait]
impl UserApi for RealProcurementApi {
    async fn get_my_project_users(&self) -> Result<Vec<UserSummary>, ApiFailure> {
        self.send_json(self.request(Method::GET, "/users/my-project-users")).await
    }

    async fn create_project_user(&self, payload: &NewUserPayload) -> Result<UserSummary, ApiFailure> {
        self.send_json(self.request(Method::POST, "/users").json(payload)).await
    }

    async fn assign_user_to_project(&self, request: &ProjectAssignmentRequest) -> Result<(), ApiFailure> {
        let body = AssignmentBody {
            project_id: request.project_id,
            role: request.role,
            start_date: request.start_date,
            responsibility_level: request.responsibility_level,
        };
        let path = format!("/users/{}/projects", request.user_id);
        self.send_empty(self.request(Method::POST, &path).json(&body)).await
    }

    async fn update_user(&self, id: UserId, payload: &UserUpdatePayload) -> Result<UserSummary, ApiFailure> {
        self.send_json(self.request(Method::PUT, &format!("/users/{id}")).json(payload)).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiFailure> {
        self.send_empty(self.request(Method::DELETE, &format!("/users/{id}"))).await
    }

    async fn remove_user_from_project(&self, user_id: UserId, project_id: ProjectId) -> Result<(), ApiFailure> {
        let path = format!("/users/{user_id}/projects/{project_id}");
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}

#[async_trait]
impl RequestApi for RealProcurementApi {
    /// A 409 listing duplicates is an answer, not a failure
    async fn submit_material_request(&self, draft: &MaterialRequestDraft) -> Result<RequestSubmission, ApiFailure> {
        let response = self
            .request(Method::POST, "/material-requests")
            .json(draft)
            .send()
            .await
            .map_err(transport_failure)?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<DuplicateBody>(&body) {
                Ok(parsed) if !parsed.duplicates.is_empty() => {
                    component_debug!(ComponentId::Requests, "server reported {} duplicate(s)", parsed.duplicates.len());
                    Ok(RequestSubmission::DuplicatesFound { warnings: parsed.duplicates })
                }
                Ok(parsed) => Err(ApiFailure::Conflict { message: parsed.message }),
                Err(_) => Err(ApiFailure::Conflict { message: error_message(&body) }),
            };
        }
        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        let created: CreatedRequest = response.json().await.map_err(|e| ApiFailure::Decode(e.to_string()))?;
        Ok(RequestSubmission::Accepted { request_id: created.id })
    }
}
