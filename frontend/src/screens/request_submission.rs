//! Material request submission with the duplicate-justification detour

use shared::{component_info, component_warn, ComponentId, RequestId};

use crate::core::duplicates::DuplicateConflictResolver;
use crate::core::feedback::{ActionContext, UserMessage};
use crate::traits::RequestApi;
use crate::types::{MaterialRequestDraft, RequestSubmission};

/// Where a submission attempt left the screen
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted(RequestId),
    /// The server found overlapping requests; the resolver is now open
    NeedsJustification,
}

fn check_draft(draft: &MaterialRequestDraft) -> Result<(), UserMessage> {
    if draft.title.trim().is_empty() {
        return Err(UserMessage::validation("Request title is required"));
    }
    if draft.items.is_empty() {
        return Err(UserMessage::validation("Add at least one material"));
    }
    if draft.items.iter().any(|line| line.name.trim().is_empty() || line.quantity <= 0.0) {
        return Err(UserMessage::validation("Every material needs a name and a positive quantity"));
    }
    if draft.planned_end_date < draft.planned_start_date {
        return Err(UserMessage::validation("Planned end date cannot be before the start date"));
    }
    Ok(())
}

pub struct MaterialRequestScreen<R: RequestApi> {
    api: R,
    draft: MaterialRequestDraft,
    resolver: Option<DuplicateConflictResolver>,
    banner: Option<UserMessage>,
}

impl<R: RequestApi> MaterialRequestScreen<R> {
    pub fn new(draft: MaterialRequestDraft, api: R) -> Self {
        Self { api, draft, resolver: None, banner: None }
    }

    pub fn draft(&self) -> &MaterialRequestDraft {
        &self.draft
    }

    /// Editable while no conflict dialog is open
    pub fn draft_mut(&mut self) -> Option<&mut MaterialRequestDraft> {
        match self.resolver {
            Some(_) => None,
            None => Some(&mut self.draft),
        }
    }

    pub fn resolver(&self) -> Option<&DuplicateConflictResolver> {
        self.resolver.as_ref()
    }

    pub fn resolver_mut(&mut self) -> Option<&mut DuplicateConflictResolver> {
        self.resolver.as_mut()
    }

    pub fn banner(&self) -> Option<&UserMessage> {
        self.banner.as_ref()
    }

    fn fail(&mut self, message: UserMessage) -> UserMessage {
        self.banner = Some(message.clone());
        message
    }

    async fn send(&mut self, draft: MaterialRequestDraft) -> Result<SubmissionOutcome, UserMessage> {
        match self.api.submit_material_request(&draft).await {
            Ok(RequestSubmission::Accepted { request_id }) => {
                component_info!(ComponentId::Requests, "request '{}' accepted as {}", draft.title, request_id);
                self.resolver = None;
                self.banner = None;
                Ok(SubmissionOutcome::Accepted(request_id))
            }
            Ok(RequestSubmission::DuplicatesFound { warnings }) => {
                component_warn!(
                    ComponentId::Requests,
                    "request '{}' overlaps {} existing request(s)",
                    draft.title,
                    warnings.len()
                );
                self.resolver = Some(DuplicateConflictResolver::open(warnings));
                self.banner = None;
                Ok(SubmissionOutcome::NeedsJustification)
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::SubmitRequest))),
        }
    }

    /// First submission, without any justification attached
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, UserMessage> {
        if self.resolver.is_some() {
            return Ok(SubmissionOutcome::NeedsJustification);
        }
        if let Err(message) = check_draft(&self.draft) {
            return Err(self.fail(message));
        }
        let draft = MaterialRequestDraft { duplicate_justification: None, ..self.draft.clone() };
        self.send(draft).await
    }

    /// Closes the conflict dialog. The draft stays as it was.
    pub fn cancel_resolution(&mut self) {
        if let Some(resolver) = self.resolver.take() {
            resolver.cancel();
        }
    }

    /// Resubmits with the typed explanation once it is non-blank
    pub async fn confirm_with_justification(&mut self) -> Result<SubmissionOutcome, UserMessage> {
        let Some(resolver) = self.resolver.as_ref() else {
            return Err(self.fail(UserMessage::validation("There is no duplicate warning to justify")));
        };

        let mut justification = None;
        if !resolver.confirm(|text| justification = Some(text)) {
            return Err(self.fail(UserMessage::validation("Please explain why this request is needed")));
        }
        let draft = MaterialRequestDraft { duplicate_justification: justification, ..self.draft.clone() };
        self.send(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{ApiFailure, DuplicateWarning, ProjectId, RequestStatus};

    use crate::core::feedback::MessageKind;
    use crate::traits::MockRequestApi;
    use crate::types::MaterialLine;

    fn draft() -> MaterialRequestDraft {
        MaterialRequestDraft {
            project_id: ProjectId::new(),
            site_id: None,
            title: "Cement for columns".into(),
            boq_reference_code: Some("BOQ-12".into()),
            planned_start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            planned_end_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            items: vec![MaterialLine { name: "Cement".into(), quantity: 120.0, unit: "bag".into() }],
            duplicate_justification: None,
        }
    }

    fn warning() -> DuplicateWarning {
        DuplicateWarning {
            request_id: RequestId::new(),
            request_title: "Cement for slab".into(),
            boq_reference_code: None,
            planned_start_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            planned_end_date: NaiveDate::from_ymd_opt(2025, 3, 25),
            overlapping_materials: vec!["Cement".into()],
            timeline_overlap_percentage: 80.0,
            status: RequestStatus::Approved,
            site_name: Some("Block A".into()),
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let mut api = MockRequestApi::new();
        api.expect_submit_material_request().never();
        let bad = MaterialRequestDraft { items: vec![], ..draft() };
        let mut screen = MaterialRequestScreen::new(bad, api);

        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.kind, MessageKind::Validation);
    }

    #[tokio::test]
    async fn test_duplicates_then_justified_resubmission() {
        let accepted = RequestId::new();
        let mut api = MockRequestApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_submit_material_request()
            .withf(|d| d.duplicate_justification.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(RequestSubmission::DuplicatesFound { warnings: vec![warning()] }));
        api.expect_submit_material_request()
            .withf(|d| d.duplicate_justification.as_deref() == Some("Second pour needs more"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(RequestSubmission::Accepted { request_id: accepted }));

        let mut screen = MaterialRequestScreen::new(draft(), api);
        assert_eq!(screen.submit().await, Ok(SubmissionOutcome::NeedsJustification));
        assert_eq!(screen.resolver().unwrap().rows()[0].overlap, "80%");
        assert!(screen.draft_mut().is_none());

        let err = screen.confirm_with_justification().await.unwrap_err();
        assert_eq!(err.kind, MessageKind::Validation);

        screen.resolver_mut().unwrap().set_explanation("Second pour needs more");
        assert_eq!(screen.confirm_with_justification().await, Ok(SubmissionOutcome::Accepted(accepted)));
        assert!(screen.resolver().is_none());
    }

    #[tokio::test]
    async fn test_cancel_keeps_draft() {
        let mut api = MockRequestApi::new();
        api.expect_submit_material_request()
            .returning(|_| Ok(RequestSubmission::DuplicatesFound { warnings: vec![warning()] }));

        let original = draft();
        let mut screen = MaterialRequestScreen::new(original.clone(), api);
        screen.submit().await.unwrap();
        screen.cancel_resolution();

        assert!(screen.resolver().is_none());
        assert_eq!(screen.draft(), &original);
        assert!(screen.draft_mut().is_some());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_resolver_open() {
        let mut api = MockRequestApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_submit_material_request()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(RequestSubmission::DuplicatesFound { warnings: vec![warning()] }));
        api.expect_submit_material_request()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApiFailure::Network("connection refused".into())));

        let mut screen = MaterialRequestScreen::new(draft(), api);
        screen.submit().await.unwrap();
        screen.resolver_mut().unwrap().set_explanation("Scope change");
        let err = screen.confirm_with_justification().await.unwrap_err();

        assert_eq!(err.kind, MessageKind::Network);
        assert_eq!(screen.resolver().unwrap().explanation(), "Scope change");
    }
}
