//! Work sites of an existing project

use thiserror::Error;

use shared::{component_info, component_warn, ComponentId, Coordinates, ProjectId, SiteId};

use crate::core::currency::parse_amount;
use crate::core::feedback::{ActionContext, UserMessage};
use crate::core::pending::{ActionTarget, ConfirmationGate, PendingAction};
use crate::traits::SiteApi;
use crate::types::{SitePayload, SiteRecord};

/// Site form as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteDraft {
    pub name: String,
    pub budget_cap: String,
    pub location: String,
    pub gps_center: String,
}

impl From<&SiteRecord> for SiteDraft {
    fn from(site: &SiteRecord) -> Self {
        Self {
            name: site.name.clone(),
            budget_cap: site.budget_cap.map(|b| b.to_string()).unwrap_or_default(),
            location: site.location.clone().unwrap_or_default(),
            gps_center: site.gps_center.clone().unwrap_or_default(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteDraftError {
    #[error("Site name is required")]
    NameRequired,
    #[error("Budget cap must be a non-negative amount")]
    InvalidBudget,
    #[error("GPS centre must look like \"lat,lng\"")]
    InvalidGps,
}

impl SiteDraft {
    /// Checks the draft and builds the payload for `project_id`
    pub fn to_payload(&self, project_id: ProjectId) -> Result<SitePayload, Vec<SiteDraftError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(SiteDraftError::NameRequired);
        }

        let budget_cap = if self.budget_cap.trim().is_empty() {
            Some(0.0)
        } else {
            parse_amount(&self.budget_cap).filter(|b| *b >= 0.0)
        };
        if budget_cap.is_none() {
            errors.push(SiteDraftError::InvalidBudget);
        }

        let gps = self.gps_center.trim();
        let gps_center = if gps.is_empty() {
            Some(None)
        } else {
            gps.parse::<Coordinates>().ok().map(|c| Some(c.to_string()))
        };
        if gps_center.is_none() {
            errors.push(SiteDraftError::InvalidGps);
        }

        match (budget_cap, gps_center) {
            (Some(budget_cap), Some(gps_center)) if errors.is_empty() => Ok(SitePayload {
                project_id,
                name: name.to_string(),
                budget_cap,
                location: self.location.trim().to_string(),
                gps_center,
            }),
            _ => Err(errors),
        }
    }
}

pub struct SiteManager<S: SiteApi> {
    project_id: ProjectId,
    api: S,
    sites: Vec<SiteRecord>,
    deletion: ConfirmationGate,
    banner: Option<UserMessage>,
}

impl<S: SiteApi> SiteManager<S> {
    pub fn new(project_id: ProjectId, api: S) -> Self {
        Self { project_id, api, sites: Vec::new(), deletion: ConfirmationGate::new(), banner: None }
    }

    pub fn sites(&self) -> &[SiteRecord] {
        &self.sites
    }

    pub fn banner(&self) -> Option<&UserMessage> {
        self.banner.as_ref()
    }

    fn fail(&mut self, message: UserMessage) -> UserMessage {
        self.banner = Some(message.clone());
        message
    }

    pub async fn load(&mut self) -> Result<(), UserMessage> {
        match self.api.get_sites_by_project(self.project_id).await {
            Ok(sites) => {
                self.sites = sites;
                self.banner = None;
                Ok(())
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::LoadData))),
        }
    }

    /// Creates a site, or updates `existing`
    pub async fn save(&mut self, existing: Option<SiteId>, draft: &SiteDraft) -> Result<SiteRecord, UserMessage> {
        let payload = match draft.to_payload(self.project_id) {
            Ok(payload) => payload,
            Err(errors) => {
                let text = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(". ");
                return Err(self.fail(UserMessage::validation(text)));
            }
        };

        let saved = match existing {
            Some(id) => self.api.update_site(id, &payload).await,
            None => self.api.create_site(&payload).await,
        };
        match saved {
            Ok(site) => {
                match self.sites.iter_mut().find(|s| s.id == site.id) {
                    Some(slot) => *slot = site.clone(),
                    None => self.sites.push(site.clone()),
                }
                self.banner = None;
                component_info!(ComponentId::Sites, "site '{}' saved", site.name);
                Ok(site)
            }
            Err(failure) => {
                component_warn!(ComponentId::Sites, "saving site failed: {}", failure);
                Err(self.fail(UserMessage::from_failure(&failure, ActionContext::SaveSite)))
            }
        }
    }

    pub fn request_delete(&mut self, site_id: SiteId) -> bool {
        let Some(site) = self.sites.iter().find(|s| s.id == site_id) else {
            return false;
        };
        let label = site.name.clone();
        self.deletion.request(ActionTarget::Site(site_id), label);
        true
    }

    pub fn pending_delete(&self) -> Option<&PendingAction> {
        self.deletion.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.deletion.cancel();
    }

    /// Deletes the site awaiting confirmation. `Ok(None)` when nothing was pending.
    pub async fn confirm_delete(&mut self) -> Result<Option<SiteId>, UserMessage> {
        let Some(PendingAction { target: ActionTarget::Site(site_id), .. }) = self.deletion.confirm() else {
            return Ok(None);
        };
        match self.api.delete_site(site_id).await {
            Ok(()) => {
                self.sites.retain(|s| s.id != site_id);
                self.banner = None;
                Ok(Some(site_id))
            }
            Err(failure) => Err(self.fail(UserMessage::from_failure(&failure, ActionContext::DeleteSite))),
        }
    }
}
