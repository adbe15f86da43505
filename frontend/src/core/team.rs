//! Project team editing: role-compatibility rules, the add/edit form and
//! gated removal

use chrono::NaiveDate;
use shared::{AssignmentId, ProjectId, ProjectRole, ResponsibilityLevel, SystemRole, UserId};
use thiserror::Error;

use crate::core::pending::{ActionTarget, ConfirmationGate, PendingAction};
use crate::types::{TeamAssignment, TeamMemberPayload, TeamMemberUpdate, UserSummary};

/// Which users may fill a project role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    pub role: ProjectRole,
    /// `None` accepts every system role
    pub accepted: Option<&'static [SystemRole]>,
    pub requires_registration: bool,
}

const ENGINEERS: &[SystemRole] = &[SystemRole::Engineer];

pub const ROLE_REQUIREMENTS: [RoleRequirement; 7] = [
    RoleRequirement { role: ProjectRole::ProjectManager, accepted: None, requires_registration: false },
    RoleRequirement { role: ProjectRole::SiteEngineer, accepted: Some(ENGINEERS), requires_registration: true },
    RoleRequirement { role: ProjectRole::ResidentEngineer, accepted: Some(ENGINEERS), requires_registration: true },
    RoleRequirement { role: ProjectRole::QuantitySurveyor, accepted: None, requires_registration: false },
    RoleRequirement { role: ProjectRole::SiteSupervisor, accepted: None, requires_registration: false },
    RoleRequirement { role: ProjectRole::Storekeeper, accepted: None, requires_registration: false },
    RoleRequirement { role: ProjectRole::Foreman, accepted: None, requires_registration: false },
];

impl RoleRequirement {
    pub fn for_role(role: ProjectRole) -> RoleRequirement {
        ROLE_REQUIREMENTS
            .iter()
            .copied()
            .find(|req| req.role == role)
            .unwrap_or(RoleRequirement { role, accepted: None, requires_registration: false })
    }

    pub fn admits(&self, user: &UserSummary) -> bool {
        let role_ok = self.accepted.map_or(true, |roles| roles.contains(&user.role));
        role_ok && (!self.requires_registration || user.has_registration())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentFormError {
    #[error("No assignment form is open")]
    NotOpen,
    #[error("Assignment not found in the current team")]
    UnknownAssignment,
    #[error("User is not in the candidate pool")]
    UnknownUser,
    #[error("The user cannot be changed on an existing assignment")]
    UserLocked,
    #[error("This user is already assigned to the project")]
    AlreadyAssigned,
    #[error("This user is not eligible for the {role} role")]
    Ineligible { role: ProjectRole },
    #[error("Role is required")]
    RoleRequired,
    #[error("User is required")]
    UserRequired,
    #[error("Start date is required")]
    StartDateRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentForm {
    /// Present when editing an existing assignment
    pub editing: Option<AssignmentId>,
    pub role: Option<ProjectRole>,
    pub user_id: Option<UserId>,
    pub responsibility_level: ResponsibilityLevel,
    pub start_date: Option<NaiveDate>,
}

impl AssignmentForm {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

/// What to send once the form is submitted
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentDraft {
    Add(TeamMemberPayload),
    Update { assignment: AssignmentId, update: TeamMemberUpdate },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub user: &'a UserSummary,
    /// Shown but not selectable
    pub already_assigned: bool,
}

#[derive(Debug, Clone)]
pub struct TeamAssignmentEditor {
    project_id: ProjectId,
    team: Vec<TeamAssignment>,
    available_users: Vec<UserSummary>,
    form: Option<AssignmentForm>,
    removal: ConfirmationGate,
}

impl TeamAssignmentEditor {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            team: Vec::new(),
            available_users: Vec::new(),
            form: None,
            removal: ConfirmationGate::new(),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn team(&self) -> &[TeamAssignment] {
        &self.team
    }

    pub fn set_team(&mut self, team: Vec<TeamAssignment>) {
        self.team = team;
    }

    pub fn available_users(&self) -> &[UserSummary] {
        &self.available_users
    }

    pub fn set_available_users(&mut self, users: Vec<UserSummary>) {
        self.available_users = users;
    }

    pub fn is_assigned(&self, user_id: UserId) -> bool {
        self.team.iter().any(|a| a.user_id == user_id)
    }

    pub fn form(&self) -> Option<&AssignmentForm> {
        self.form.as_ref()
    }

    pub fn begin_add(&mut self, today: NaiveDate) {
        self.form = Some(AssignmentForm {
            editing: None,
            role: None,
            user_id: None,
            responsibility_level: ResponsibilityLevel::default(),
            start_date: Some(today),
        });
    }

    pub fn begin_edit(&mut self, assignment: AssignmentId) -> Result<(), AssignmentFormError> {
        let existing = self
            .team
            .iter()
            .find(|a| a.id == assignment)
            .ok_or(AssignmentFormError::UnknownAssignment)?;
        self.form = Some(AssignmentForm {
            editing: Some(existing.id),
            role: Some(existing.role),
            user_id: Some(existing.user_id),
            responsibility_level: existing.responsibility_level,
            start_date: existing.start_date,
        });
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    fn open_form(&mut self) -> Result<&mut AssignmentForm, AssignmentFormError> {
        self.form.as_mut().ok_or(AssignmentFormError::NotOpen)
    }

    /// Changing the role drops a selected user the new role does not admit
    pub fn select_role(&mut self, role: ProjectRole) -> Result<(), AssignmentFormError> {
        let requirement = RoleRequirement::for_role(role);
        let selected_user = self.form.as_ref().and_then(|f| f.user_id);
        let still_admitted = selected_user
            .and_then(|id| self.available_users.iter().find(|u| u.id == id))
            .is_some_and(|user| requirement.admits(user));

        let form = self.open_form()?;
        if form.is_editing() {
            return Err(AssignmentFormError::UserLocked);
        }
        form.role = Some(role);
        if !still_admitted {
            form.user_id = None;
        }
        Ok(())
    }

    pub fn select_user(&mut self, user_id: UserId) -> Result<(), AssignmentFormError> {
        let already_assigned = self.is_assigned(user_id);
        let role = self.form.as_ref().and_then(|f| f.role);
        let user = self.available_users.iter().find(|u| u.id == user_id);
        let ineligible_for = match (role, user) {
            (Some(role), Some(user)) if !RoleRequirement::for_role(role).admits(user) => Some(role),
            _ => None,
        };
        let known = user.is_some();

        let form = self.open_form()?;
        if form.is_editing() {
            return Err(AssignmentFormError::UserLocked);
        }
        if !known {
            return Err(AssignmentFormError::UnknownUser);
        }
        if already_assigned {
            return Err(AssignmentFormError::AlreadyAssigned);
        }
        if let Some(role) = ineligible_for {
            return Err(AssignmentFormError::Ineligible { role });
        }
        form.user_id = Some(user_id);
        Ok(())
    }

    pub fn set_responsibility_level(&mut self, level: ResponsibilityLevel) -> Result<(), AssignmentFormError> {
        self.open_form()?.responsibility_level = level;
        Ok(())
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> Result<(), AssignmentFormError> {
        self.open_form()?.start_date = date;
        Ok(())
    }

    /// Candidate pool filtered by the selected role. Users already on the
    /// team stay listed but flagged.
    pub fn candidates(&self) -> Vec<Candidate<'_>> {
        let requirement = self.form.as_ref().and_then(|f| f.role).map(RoleRequirement::for_role);
        self.available_users
            .iter()
            .filter(|user| requirement.map_or(true, |req| req.admits(user)))
            .map(|user| Candidate { user, already_assigned: self.is_assigned(user.id) })
            .collect()
    }

    pub fn submit_draft(&self) -> Result<AssignmentDraft, AssignmentFormError> {
        let form = self.form.as_ref().ok_or(AssignmentFormError::NotOpen)?;
        let start_date = form.start_date.ok_or(AssignmentFormError::StartDateRequired)?;

        if let Some(assignment) = form.editing {
            return Ok(AssignmentDraft::Update {
                assignment,
                update: TeamMemberUpdate { responsibility_level: form.responsibility_level, start_date },
            });
        }

        let role = form.role.ok_or(AssignmentFormError::RoleRequired)?;
        let user_id = form.user_id.ok_or(AssignmentFormError::UserRequired)?;
        if self.is_assigned(user_id) {
            return Err(AssignmentFormError::AlreadyAssigned);
        }
        Ok(AssignmentDraft::Add(TeamMemberPayload {
            user_id,
            role,
            responsibility_level: form.responsibility_level,
            start_date,
        }))
    }

    /// Stores the server's copy of a saved assignment and closes the form
    pub fn record_saved(&mut self, saved: TeamAssignment) {
        match self.team.iter_mut().find(|a| a.id == saved.id) {
            Some(existing) => *existing = saved,
            None => self.team.push(saved),
        }
        self.form = None;
    }

    /// First phase of removal; false when the assignment is unknown
    pub fn request_removal(&mut self, assignment: AssignmentId) -> bool {
        let Some(existing) = self.team.iter().find(|a| a.id == assignment) else {
            return false;
        };
        let label = existing.user_name.clone();
        self.removal.request(ActionTarget::TeamMember { project: self.project_id, assignment }, label);
        true
    }

    pub fn pending_removal(&self) -> Option<&PendingAction> {
        self.removal.pending()
    }

    pub fn cancel_removal(&mut self) {
        self.removal.cancel();
    }

    /// Second phase; yields the assignment to delete
    pub fn confirm_removal(&mut self) -> Option<AssignmentId> {
        match self.removal.confirm()?.target {
            ActionTarget::TeamMember { assignment, .. } => Some(assignment),
            _ => None,
        }
    }

    pub fn removal_completed(&mut self, assignment: AssignmentId) {
        self.team.retain(|a| a.id != assignment);
    }
}
