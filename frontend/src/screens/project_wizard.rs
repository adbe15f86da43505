//! Project create/edit wizard screen
//!
//! Owns one [`WizardStateMachine`] and the services it needs. Geocoding
//! lookups and persistence calls happen here; every answer goes back into
//! the machine, which decides what to keep.

use shared::{component_debug, component_info, component_warn, ComponentId, Coordinates, ProjectId, SiteId};

use crate::core::feedback::{ActionContext, UserMessage};
use crate::core::form::{FieldChange, WizardFormState};
use crate::core::machine::{GeocodeOutcome, GeocodeRequest, WizardMode, WizardStateMachine, WizardStep};
use crate::core::sites::SiteField;
use crate::services::SharedConverter;
use crate::traits::{GeocodingGateway, ProjectApi, SiteApi};
use crate::types::ProjectRecord;

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    /// Saved; the wizard is finished and the caller navigates away
    Completed {
        project: ProjectRecord,
        /// Removed sites whose deletion failed
        orphaned_sites: Vec<SiteId>,
    },
    /// Local validation failed; see the machine's errors
    Invalid,
    /// The server call failed; the form is untouched
    Failed(UserMessage),
    /// The wizard already completed
    Closed,
}

pub struct ProjectWizard<G, P, S>
where
    G: GeocodingGateway,
    P: ProjectApi,
    S: SiteApi,
{
    machine: WizardStateMachine,
    converter: SharedConverter,
    geocoder: G,
    projects: P,
    sites: S,
}

impl<G, P, S> ProjectWizard<G, P, S>
where
    G: GeocodingGateway,
    P: ProjectApi,
    S: SiteApi,
{
    pub fn new_create(geocoder: G, projects: P, sites: S, converter: SharedConverter) -> Self {
        Self { machine: WizardStateMachine::new_create(), converter, geocoder, projects, sites }
    }

    pub fn from_draft(
        mode: WizardMode,
        form: WizardFormState,
        geocoder: G,
        projects: P,
        sites: S,
        converter: SharedConverter,
    ) -> Self {
        Self { machine: WizardStateMachine::from_draft(mode, form), converter, geocoder, projects, sites }
    }

    /// Fetches the project and its sites and opens the wizard in edit mode
    pub async fn load(
        project_id: ProjectId,
        geocoder: G,
        projects: P,
        sites: S,
        converter: SharedConverter,
    ) -> Result<Self, UserMessage> {
        let (project, site_records) =
            tokio::join!(projects.get_project_by_id(project_id), sites.get_sites_by_project(project_id));
        let project = project.map_err(|f| UserMessage::from_failure(&f, ActionContext::LoadData))?;
        let site_records = site_records.map_err(|f| UserMessage::from_failure(&f, ActionContext::LoadData))?;

        component_info!(
            ComponentId::Wizard,
            "editing project {} with {} site(s)",
            project_id,
            site_records.len()
        );
        let form = WizardFormState::from_record(&project, &site_records);
        Ok(Self { machine: WizardStateMachine::new_edit(project_id, form), converter, geocoder, projects, sites })
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.machine = self.machine.with_country(country);
        self
    }

    pub fn machine(&self) -> &WizardStateMachine {
        &self.machine
    }

    pub fn step(&self) -> WizardStep {
        self.machine.step()
    }

    /// Applies an edit and, for geography edits, resolves the lookup at once
    pub async fn change(&mut self, change: FieldChange) -> Option<GeocodeOutcome> {
        let request = self.machine.handle_change(change)?;
        Some(self.resolve(request).await)
    }

    /// Applies an edit but leaves the lookup to the caller, so several
    /// lookups may be in flight at once
    pub fn change_deferred(&mut self, change: FieldChange) -> Option<GeocodeRequest> {
        self.machine.handle_change(change)
    }

    pub async fn resolve(&mut self, request: GeocodeRequest) -> GeocodeOutcome {
        component_debug!(ComponentId::Wizard, "geocoding {} '{}'", request.level, request.query);
        let found = self.geocoder.geocode(&request.query).await;
        let outcome = self.machine.apply_geocode(request.ticket, found);
        if outcome == GeocodeOutcome::Stale {
            component_debug!(ComponentId::Wizard, "dropped stale lookup for '{}'", request.query);
        }
        outcome
    }

    pub fn select_map_point(&mut self, coords: Coordinates) {
        self.machine.select_map_point(coords);
    }

    pub fn add_site(&mut self) {
        self.machine.add_site();
    }

    pub fn remove_site(&mut self, index: usize) -> bool {
        self.machine.remove_site(index)
    }

    pub fn update_site(&mut self, index: usize, field: SiteField, value: impl Into<String>) {
        self.machine.update_site(index, field, value);
    }

    pub fn next(&mut self) -> bool {
        self.machine.next()
    }

    pub fn previous(&mut self) {
        self.machine.previous();
    }

    /// Walks forward until Review or the first step that fails validation
    pub fn advance_to_review(&mut self) -> bool {
        while self.machine.step() != WizardStep::Review {
            if !self.machine.next() {
                return false;
            }
        }
        true
    }

    /// Validates and persists from the Review step. Holding `&mut self` for
    /// the whole call means a second submit cannot start while one is running.
    pub async fn submit(&mut self) -> SubmitStatus {
        if self.machine.is_finished() {
            return SubmitStatus::Closed;
        }

        let payload = {
            let converter = self.converter.read().await;
            self.machine.prepare_submission(&converter)
        };
        let Some(payload) = payload else {
            component_debug!(ComponentId::Wizard, "submit blocked by validation");
            return SubmitStatus::Invalid;
        };

        let mode = self.machine.mode();
        let saved = match mode {
            WizardMode::Create => self.projects.create_project(&payload).await,
            WizardMode::Edit(id) => self.projects.update_project(id, &payload).await,
        };

        let project = match saved {
            Ok(project) => project,
            Err(failure) => {
                let message = UserMessage::from_failure(&failure, ActionContext::SaveProject);
                component_warn!(ComponentId::Wizard, "saving project failed: {}", failure);
                self.machine.submission_failed(&message);
                return SubmitStatus::Failed(message);
            }
        };

        let orphaned_sites = match mode {
            WizardMode::Edit(_) => self.delete_removed_sites().await,
            WizardMode::Create => Vec::new(),
        };

        component_info!(ComponentId::Wizard, "project '{}' saved", project.name);
        self.machine.finish();
        SubmitStatus::Completed { project, orphaned_sites }
    }

    async fn delete_removed_sites(&self) -> Vec<SiteId> {
        let mut orphaned = Vec::new();
        for site_id in self.machine.removed_site_ids() {
            if let Err(failure) = self.sites.delete_site(site_id).await {
                component_warn!(ComponentId::Wizard, "could not delete removed site {}: {}", site_id, failure);
                orphaned.push(site_id);
            }
        }
        orphaned
    }
}
