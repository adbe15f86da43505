//! Project team screen

use chrono::NaiveDate;
use shared::{component_info, component_warn, AssignmentId, ComponentId, ProjectId};

use crate::core::feedback::{ActionContext, UserMessage};
use crate::core::team::{AssignmentDraft, TeamAssignmentEditor};
use crate::traits::TeamApi;
use crate::types::TeamAssignment;

pub struct TeamScreen<T: TeamApi> {
    api: T,
    editor: TeamAssignmentEditor,
    banner: Option<UserMessage>,
}

impl<T: TeamApi> TeamScreen<T> {
    pub fn new(project_id: ProjectId, api: T) -> Self {
        Self { api, editor: TeamAssignmentEditor::new(project_id), banner: None }
    }

    pub fn editor(&self) -> &TeamAssignmentEditor {
        &self.editor
    }

    /// Form edits (role, user, level, date) go straight to the editor
    pub fn editor_mut(&mut self) -> &mut TeamAssignmentEditor {
        &mut self.editor
    }

    pub fn banner(&self) -> Option<&UserMessage> {
        self.banner.as_ref()
    }

    fn fail(&mut self, message: UserMessage) -> UserMessage {
        self.banner = Some(message.clone());
        message
    }

    /// Loads the team and the candidate pool side by side. Each list is
    /// kept if it arrives, even when the other fails.
    pub async fn load(&mut self) -> Result<(), UserMessage> {
        let project_id = self.editor.project_id();
        let (team, candidates) = tokio::join!(self.api.get_project_team(project_id), self.api.get_available_engineers());

        let mut first_failure = None;
        match team {
            Ok(team) => self.editor.set_team(team),
            Err(failure) => first_failure = Some(failure),
        }
        match candidates {
            Ok(users) => self.editor.set_available_users(users),
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }

        match first_failure {
            None => {
                self.banner = None;
                Ok(())
            }
            Some(failure) => {
                component_warn!(ComponentId::Team, "loading team data failed: {}", failure);
                Err(self.fail(UserMessage::from_failure(&failure, ActionContext::LoadData)))
            }
        }
    }

    pub fn begin_add(&mut self, today: NaiveDate) {
        self.editor.begin_add(today);
    }

    /// Sends the open form as an add or an update
    pub async fn save(&mut self) -> Result<TeamAssignment, UserMessage> {
        let draft = match self.editor.submit_draft() {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(UserMessage::validation(e.to_string()))),
        };

        let project_id = self.editor.project_id();
        let saved = match &draft {
            AssignmentDraft::Add(payload) => self.api.add_team_member(project_id, payload).await,
            AssignmentDraft::Update { assignment, update } => {
                self.api.update_team_member(project_id, *assignment, update).await
            }
        };

        match saved {
            Ok(assignment) => {
                component_info!(ComponentId::Team, "{} assigned as {}", assignment.user_name, assignment.role);
                self.editor.record_saved(assignment.clone());
                self.banner = None;
                Ok(assignment)
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::SaveTeamMember))),
        }
    }

    pub fn request_removal(&mut self, assignment: AssignmentId) -> bool {
        self.editor.request_removal(assignment)
    }

    pub fn cancel_removal(&mut self) {
        self.editor.cancel_removal();
    }

    /// Runs the confirmed removal. `Ok(None)` when nothing was pending.
    pub async fn confirm_removal(&mut self) -> Result<Option<AssignmentId>, UserMessage> {
        let Some(assignment) = self.editor.confirm_removal() else {
            return Ok(None);
        };
        match self.api.remove_team_member(self.editor.project_id(), assignment).await {
            Ok(()) => {
                self.editor.removal_completed(assignment);
                self.banner = None;
                Ok(Some(assignment))
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::RemoveTeamMember))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ApiFailure, ProjectRole, ResponsibilityLevel, SystemRole, UserId};

    use crate::core::feedback::{MessageKind, DUPLICATE_ASSIGNMENT_MESSAGE};
    use crate::traits::MockTeamApi;
    use crate::types::UserSummary;

    fn engineer() -> UserSummary {
        UserSummary {
            id: UserId::new(),
            full_name: "Zawadi Mrema".into(),
            email: "zawadi@example.co.tz".into(),
            role: SystemRole::Engineer,
            erb_number: Some("ERB-2291".into()),
            phone: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[tokio::test]
    async fn test_partial_load_keeps_what_arrived() {
        let mut api = MockTeamApi::new();
        api.expect_get_project_team().returning(|_| Err(ApiFailure::Server { status: 502 }));
        api.expect_get_available_engineers().returning(|| Ok(vec![engineer()]));

        let mut screen = TeamScreen::new(ProjectId::new(), api);
        let err = screen.load().await.unwrap_err();
        assert_eq!(err.kind, MessageKind::Server);
        assert_eq!(screen.editor().available_users().len(), 1);
    }

    #[tokio::test]
    async fn test_add_member_updates_team() {
        let user = engineer();
        let user_id = user.id;
        let mut api = MockTeamApi::new();
        api.expect_get_project_team().returning(|_| Ok(vec![]));
        let pool = vec![user.clone()];
        api.expect_get_available_engineers().returning(move || Ok(pool.clone()));
        api.expect_add_team_member().times(1).returning(move |_, payload| {
            Ok(TeamAssignment {
                id: AssignmentId::new(),
                user_id: payload.user_id,
                user_name: "Zawadi Mrema".into(),
                role: payload.role,
                responsibility_level: payload.responsibility_level,
                start_date: Some(payload.start_date),
            })
        });

        let mut screen = TeamScreen::new(ProjectId::new(), api);
        screen.load().await.unwrap();
        screen.begin_add(today());
        screen.editor_mut().select_role(ProjectRole::SiteEngineer).unwrap();
        screen.editor_mut().select_user(user_id).unwrap();
        screen.editor_mut().set_responsibility_level(ResponsibilityLevel::Secondary).unwrap();

        let saved = screen.save().await.unwrap();
        assert_eq!(saved.user_id, user_id);
        assert_eq!(screen.editor().team().len(), 1);
        assert!(screen.editor().form().is_none());
        assert!(screen.editor().candidates()[0].already_assigned);
    }

    #[tokio::test]
    async fn test_conflict_on_add_uses_assignment_copy() {
        let user = engineer();
        let user_id = user.id;
        let mut api = MockTeamApi::new();
        api.expect_get_project_team().returning(|_| Ok(vec![]));
        api.expect_get_available_engineers().returning(move || Ok(vec![user.clone()]));
        api.expect_add_team_member().returning(|_, _| Err(ApiFailure::Conflict { message: None }));

        let mut screen = TeamScreen::new(ProjectId::new(), api);
        screen.load().await.unwrap();
        screen.begin_add(today());
        screen.editor_mut().select_role(ProjectRole::Foreman).unwrap();
        screen.editor_mut().select_user(user_id).unwrap();

        let err = screen.save().await.unwrap_err();
        assert_eq!(err.text, DUPLICATE_ASSIGNMENT_MESSAGE);
        assert!(screen.editor().form().is_some());
    }

    #[tokio::test]
    async fn test_removal_only_after_confirmation() {
        let user = engineer();
        let assignment = TeamAssignment {
            id: AssignmentId::new(),
            user_id: user.id,
            user_name: user.full_name.clone(),
            role: ProjectRole::SiteEngineer,
            responsibility_level: ResponsibilityLevel::Primary,
            start_date: Some(today()),
        };
        let assignment_id = assignment.id;

        let mut api = MockTeamApi::new();
        api.expect_get_project_team().returning(move |_| Ok(vec![assignment.clone()]));
        api.expect_get_available_engineers().returning(|| Ok(vec![]));
        api.expect_remove_team_member().times(1).returning(|_, _| Ok(()));

        let mut screen = TeamScreen::new(ProjectId::new(), api);
        screen.load().await.unwrap();

        assert_eq!(screen.confirm_removal().await, Ok(None));
        assert!(screen.request_removal(assignment_id));
        assert_eq!(screen.confirm_removal().await, Ok(Some(assignment_id)));
        assert!(screen.editor().team().is_empty());
    }
}
