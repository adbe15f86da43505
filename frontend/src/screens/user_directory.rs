//! Users visible to the current account, and their project memberships

use chrono::NaiveDate;
use shared::{
    component_info, component_warn, ComponentId, ProjectId, ProjectRole, ResponsibilityLevel, SystemRole, UserId,
};

use crate::core::feedback::{ActionContext, UserMessage};
use crate::core::pending::{ActionTarget, ConfirmationGate, PendingAction};
use crate::traits::{ProjectApi, UserApi};
use crate::types::{NewUserPayload, ProjectAssignmentRequest, ProjectSummary, UserSummary, UserUpdatePayload};

/// Project to join right after the user is created
#[derive(Debug, Clone, PartialEq)]
pub struct InitialAssignment {
    pub project_id: ProjectId,
    pub role: ProjectRole,
    pub start_date: NaiveDate,
    pub responsibility_level: ResponsibilityLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: SystemRole,
    pub erb_number: String,
    pub assignment: Option<InitialAssignment>,
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl NewUserForm {
    pub fn to_payload(&self) -> Result<NewUserPayload, UserMessage> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(UserMessage::validation("Full name is required"));
        }
        let email = self.email.trim();
        let looks_valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'));
        if !looks_valid {
            return Err(UserMessage::validation("A valid email address is required"));
        }
        Ok(NewUserPayload {
            full_name: full_name.to_string(),
            email: email.to_ascii_lowercase(),
            phone: optional(&self.phone),
            role: self.role,
            erb_number: optional(&self.erb_number),
        })
    }
}

pub struct UserDirectory<U, P>
where
    U: UserApi,
    P: ProjectApi,
{
    users_api: U,
    projects_api: P,
    users: Vec<UserSummary>,
    projects: Vec<ProjectSummary>,
    confirmation: ConfirmationGate,
    banner: Option<UserMessage>,
}

impl<U, P> UserDirectory<U, P>
where
    U: UserApi,
    P: ProjectApi,
{
    pub fn new(users_api: U, projects_api: P) -> Self {
        Self {
            users_api,
            projects_api,
            users: Vec::new(),
            projects: Vec::new(),
            confirmation: ConfirmationGate::new(),
            banner: None,
        }
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        &self.projects
    }

    pub fn banner(&self) -> Option<&UserMessage> {
        self.banner.as_ref()
    }

    fn fail(&mut self, message: UserMessage) -> UserMessage {
        self.banner = Some(message.clone());
        message
    }

    pub async fn load(&mut self) -> Result<(), UserMessage> {
        let (users, projects) =
            tokio::join!(self.users_api.get_my_project_users(), self.projects_api.get_all_projects());
        let failure = match (users, projects) {
            (Ok(users), Ok(projects)) => {
                self.users = users;
                self.projects = projects;
                self.banner = None;
                return Ok(());
            }
            (Ok(users), Err(failure)) => {
                self.users = users;
                failure
            }
            (Err(failure), Ok(projects)) => {
                self.projects = projects;
                failure
            }
            (Err(failure), Err(_)) => failure,
        };
        component_warn!(ComponentId::Users, "loading directory failed: {}", failure);
        Err(self.fail(UserMessage::from_failure(&failure, ActionContext::LoadData)))
    }

    /// Creates the user, then joins them to a project if one was chosen.
    /// A failed join leaves the created user in the list.
    pub async fn create_user(&mut self, form: &NewUserForm) -> Result<UserSummary, UserMessage> {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(message) => return Err(self.fail(message)),
        };

        let user = match self.users_api.create_project_user(&payload).await {
            Ok(user) => user,
            Err(failure) => return Err(self.fail(UserMessage::from_failure(&failure, ActionContext::CreateUser))),
        };
        self.users.push(user.clone());
        component_info!(ComponentId::Users, "created user {}", user.email);

        if let Some(assignment) = &form.assignment {
            self.assign(user.id, assignment).await?;
        }
        self.banner = None;
        Ok(user)
    }

    pub async fn assign(&mut self, user_id: UserId, assignment: &InitialAssignment) -> Result<(), UserMessage> {
        let request = ProjectAssignmentRequest {
            user_id,
            project_id: assignment.project_id,
            role: assignment.role,
            start_date: assignment.start_date,
            responsibility_level: assignment.responsibility_level,
        };
        match self.users_api.assign_user_to_project(&request).await {
            Ok(()) => {
                self.banner = None;
                Ok(())
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::AssignUser))),
        }
    }

    pub async fn update_user(&mut self, id: UserId, payload: &UserUpdatePayload) -> Result<UserSummary, UserMessage> {
        if payload.full_name.trim().is_empty() {
            return Err(self.fail(UserMessage::validation("Full name is required")));
        }
        match self.users_api.update_user(id, payload).await {
            Ok(updated) => {
                if let Some(slot) = self.users.iter_mut().find(|u| u.id == id) {
                    *slot = updated.clone();
                }
                self.banner = None;
                Ok(updated)
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::UpdateUser))),
        }
    }

    pub fn request_delete_user(&mut self, id: UserId) -> bool {
        let Some(user) = self.users.iter().find(|u| u.id == id) else {
            return false;
        };
        let label = user.full_name.clone();
        self.confirmation.request(ActionTarget::User(id), label);
        true
    }

    pub fn request_remove_from_project(&mut self, user: UserId, project: ProjectId) -> bool {
        let Some(found) = self.users.iter().find(|u| u.id == user) else {
            return false;
        };
        let label = found.full_name.clone();
        self.confirmation.request(ActionTarget::Membership { user, project }, label);
        true
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.confirmation.pending()
    }

    pub fn cancel(&mut self) {
        self.confirmation.cancel();
    }

    /// Executes whichever destructive action is awaiting confirmation
    pub async fn confirm(&mut self) -> Result<Option<ActionTarget>, UserMessage> {
        let Some(action) = self.confirmation.confirm() else {
            return Ok(None);
        };

        let (result, context) = match action.target {
            ActionTarget::User(id) => (self.users_api.delete_user(id).await, ActionContext::DeleteUser),
            ActionTarget::Membership { user, project } => (
                self.users_api.remove_user_from_project(user, project).await,
                ActionContext::RemoveMembership,
            ),
            ActionTarget::Site(_) | ActionTarget::TeamMember { .. } => return Ok(None),
        };

        match result {
            Ok(()) => {
                if let ActionTarget::User(id) = action.target {
                    self.users.retain(|u| u.id != id);
                }
                component_info!(ComponentId::Users, "{} '{}' removed", action.kind(), action.label);
                self.banner = None;
                Ok(Some(action.target))
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, context))),
        }
    }
}
