//! Test helpers shared by the frontend suites

use std::sync::Arc;

use tokio::sync::RwLock;

use frontend::core::{CurrencyConverter, FieldChange};
use frontend::screens::ProjectWizard;
use frontend::services::{SharedConverter, StaticGeocodingGateway};
use frontend::traits::{MockProjectApi, MockSiteApi};
use shared::{Industry, ProjectType};

use super::fixtures::TestFixtures;

pub type OfflineWizard = ProjectWizard<StaticGeocodingGateway, MockProjectApi, MockSiteApi>;

pub struct TestHelpers;

impl TestHelpers {
    /// Converter that already holds a fetched rate
    pub fn converter(rate: f64) -> SharedConverter {
        let mut converter = CurrencyConverter::default();
        let ticket = converter.begin_refresh();
        converter.complete_refresh(ticket, rate);
        Arc::new(RwLock::new(converter))
    }

    /// Create-mode wizard geocoding from the built-in table
    pub fn offline_wizard(projects: MockProjectApi, sites: MockSiteApi) -> OfflineWizard {
        ProjectWizard::new_create(
            StaticGeocodingGateway::default(),
            projects,
            sites,
            Self::converter(TestFixtures::USD_RATE),
        )
    }

    pub async fn fill_identity(wizard: &mut OfflineWizard, name: &str) {
        wizard.change(FieldChange::Name(name.to_string())).await;
        wizard.change(FieldChange::Industry(Some(Industry::Construction))).await;
        wizard.change(FieldChange::ProjectType(Some(ProjectType::Institutional))).await;
    }

    pub async fn fill_location(wizard: &mut OfflineWizard) {
        wizard.change(FieldChange::Region(TestFixtures::REGION.to_string())).await;
        wizard.change(FieldChange::District(TestFixtures::DISTRICT.to_string())).await;
        wizard.change(FieldChange::Ward(TestFixtures::WARD.to_string())).await;
    }

    pub async fn fill_timeline(wizard: &mut OfflineWizard) {
        wizard.change(FieldChange::StartDate(Some(TestFixtures::date("2025-01-06")))).await;
        wizard.change(FieldChange::ExpectedCompletionDate(Some(TestFixtures::date("2025-12-19")))).await;
    }
}
