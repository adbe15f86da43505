//! End-to-end flows through the screen controllers
//!
//! The wizard runs against the built-in location table and mocked
//! persistence; the request flow runs against a wiremock server through the
//! real HTTP client.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use frontend::core::{FieldChange, FormField, GeocodeOutcome, MessageKind, SiteField, WizardFormState, WizardMode, WizardStep};
use frontend::screens::{MaterialRequestScreen, ProjectWizard, SubmissionOutcome, SubmitStatus, TeamScreen};
use frontend::services::{RealProcurementApi, StaticGeocodingGateway};
use frontend::traits::{MockProjectApi, MockSiteApi, MockTeamApi};
use frontend::types::ProjectRecord;
use shared::{ApiFailure, Currency, ProjectRole};

mod common;
use common::{TestFixtures, TestHelpers};

/// A new project walks all five steps and submits a TZS budget with the
/// default site derived from the selected ward
#[tokio::test]
async fn test_create_project_end_to_end() {
    // Arrange
    let mut projects = MockProjectApi::new();
    projects
        .expect_create_project()
        .withf(|payload| {
            payload.budget_total == 2_500_000.0
                && payload.currency == Currency::Tzs
                && payload.gps_coordinates.as_deref() == Some(TestFixtures::WARD_CENTER)
                && payload.initial_sites.len() == 1
                && payload.initial_sites[0].location == "Msasani, Kinondoni, Dar es Salaam"
                && payload.initial_sites[0].gps_center.as_deref() == Some(TestFixtures::WARD_CENTER)
        })
        .times(1)
        .returning(|payload| Ok(ProjectRecord { name: payload.name.clone(), ..TestFixtures::project_record() }));
    let mut wizard = TestHelpers::offline_wizard(projects, MockSiteApi::new());

    // Act
    TestHelpers::fill_identity(&mut wizard, "Msasani Clinic").await;
    wizard.change(FieldChange::Currency(Currency::Usd)).await;
    wizard.change(FieldChange::BudgetDisplay("1,000".to_string())).await;
    assert!(wizard.next());

    TestHelpers::fill_location(&mut wizard).await;
    wizard.update_site(0, SiteField::Name, "Main block");
    assert!(wizard.next());

    TestHelpers::fill_timeline(&mut wizard).await;
    assert!(wizard.next());
    assert!(wizard.next());
    assert_eq!(wizard.step(), WizardStep::Review);

    let status = wizard.submit().await;

    // Assert
    match status {
        SubmitStatus::Completed { project, orphaned_sites } => {
            assert_eq!(project.name, "Msasani Clinic");
            assert!(orphaned_sites.is_empty());
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(wizard.submit().await, SubmitStatus::Closed);
}

/// Steps only advance once their own required fields are present
#[tokio::test]
async fn test_step_gating_reports_field_errors() {
    let mut wizard = TestHelpers::offline_wizard(MockProjectApi::new(), MockSiteApi::new());

    assert!(!wizard.next());
    assert_eq!(wizard.step(), WizardStep::Identity);
    assert!(wizard.machine().errors().get(FormField::Name).is_some());

    TestHelpers::fill_identity(&mut wizard, "Clinic").await;
    assert!(wizard.next());
    assert!(!wizard.next());
    assert_eq!(wizard.step(), WizardStep::Location);

    wizard.previous();
    assert_eq!(wizard.step(), WizardStep::Identity);
    assert!(wizard.machine().errors().is_empty());
}

/// A district from another region is refused and the default site keeps
/// its typed location
#[tokio::test]
async fn test_geography_chain_is_enforced() {
    let mut wizard = TestHelpers::offline_wizard(MockProjectApi::new(), MockSiteApi::new());
    wizard.update_site(0, SiteField::Location, "Opposite the market");

    assert_eq!(wizard.change(FieldChange::Ward(TestFixtures::WARD.to_string())).await, None);
    wizard.change(FieldChange::Region("Arusha".to_string())).await;
    assert_eq!(wizard.change(FieldChange::District(TestFixtures::DISTRICT.to_string())).await, None);

    let form = wizard.machine().form();
    assert_eq!((form.region.as_str(), form.district.as_str(), form.ward.as_str()), ("Arusha", "", ""));
    assert_eq!(form.initial_sites.default_site().location, "Opposite the market");
    assert!(wizard.machine().errors().get(FormField::District).is_some());
}

/// A negative site cap or budget keeps the wizard from moving on
#[tokio::test]
async fn test_negative_amounts_block_steps() {
    let mut projects = MockProjectApi::new();
    projects.expect_create_project().never();
    let mut wizard = TestHelpers::offline_wizard(projects, MockSiteApi::new());

    TestHelpers::fill_identity(&mut wizard, "Clinic").await;
    wizard.change(FieldChange::BudgetDisplay("-100".to_string())).await;
    assert!(!wizard.next());
    assert!(wizard.machine().errors().get(FormField::BudgetDisplay).is_some());

    wizard.change(FieldChange::BudgetDisplay("100".to_string())).await;
    assert!(wizard.next());
    TestHelpers::fill_location(&mut wizard).await;
    wizard.update_site(0, SiteField::Name, "Main block");
    wizard.update_site(0, SiteField::BudgetCap, "-5000");
    assert!(!wizard.next());
    assert_eq!(wizard.step(), WizardStep::Location);
    assert!(wizard.machine().errors().get(FormField::InitialSites).is_some());
}

/// Answers for superseded geography selections never move the map
#[tokio::test]
async fn test_out_of_order_geocoding_keeps_newest_selection() {
    // Arrange
    let mut wizard = TestHelpers::offline_wizard(MockProjectApi::new(), MockSiteApi::new());
    let region = wizard.change_deferred(FieldChange::Region(TestFixtures::REGION.to_string())).unwrap();
    let district = wizard.change_deferred(FieldChange::District(TestFixtures::DISTRICT.to_string())).unwrap();
    let ward = wizard.change_deferred(FieldChange::Ward(TestFixtures::WARD.to_string())).unwrap();

    // Act
    let ward_outcome = wizard.resolve(ward).await;
    let region_outcome = wizard.resolve(region).await;
    let district_outcome = wizard.resolve(district).await;

    // Assert
    assert_eq!(ward_outcome, GeocodeOutcome::Applied);
    assert_eq!(region_outcome, GeocodeOutcome::Stale);
    assert_eq!(district_outcome, GeocodeOutcome::Stale);
    let marker = wizard.machine().map().marker.unwrap();
    assert_eq!(marker.to_string(), TestFixtures::WARD_CENTER);
}

/// A point picked on the map is not overwritten by a lookup still in flight
#[tokio::test]
async fn test_map_pick_beats_pending_lookup() {
    let mut wizard = TestHelpers::offline_wizard(MockProjectApi::new(), MockSiteApi::new());
    let pending = wizard.change_deferred(FieldChange::Region(TestFixtures::REGION.to_string())).unwrap();

    let picked = "-6.800000,39.300000".parse().unwrap();
    wizard.select_map_point(picked);

    assert_eq!(wizard.resolve(pending).await, GeocodeOutcome::Stale);
    assert_eq!(wizard.machine().form().gps_coordinates, Some(picked));
    assert_eq!(wizard.machine().form().initial_sites.default_site().gps_center, "-6.800000,39.300000");
}

/// Editing a project deletes removed sites after the update; a failed
/// deletion is reported instead of failing the save
#[tokio::test]
async fn test_edit_reports_orphaned_sites() {
    // Arrange
    let mut projects = MockProjectApi::new();
    projects.expect_get_project_by_id().returning(|_| Ok(TestFixtures::project_record()));
    projects
        .expect_update_project()
        .withf(|id, payload| *id == TestFixtures::project_id() && payload.initial_sites.len() == 1)
        .times(1)
        .returning(|_, _| Ok(TestFixtures::project_record()));
    let mut sites = MockSiteApi::new();
    sites.expect_get_sites_by_project().returning(|_| Ok(TestFixtures::site_records()));
    sites
        .expect_delete_site()
        .withf(|id| *id == TestFixtures::site_id_2())
        .times(1)
        .returning(|_| Err(ApiFailure::Server { status: 500 }));

    let mut wizard = ProjectWizard::load(
        TestFixtures::project_id(),
        StaticGeocodingGateway::default(),
        projects,
        sites,
        TestHelpers::converter(TestFixtures::USD_RATE),
    )
    .await
    .unwrap();

    // Act
    assert_eq!(wizard.machine().form().initial_sites.len(), 2);
    assert!(wizard.remove_site(1));
    assert!(wizard.advance_to_review());
    let status = wizard.submit().await;

    // Assert
    match status {
        SubmitStatus::Completed { orphaned_sites, .. } => {
            assert_eq!(orphaned_sites, vec![TestFixtures::site_id_2()]);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

/// A failed save leaves every entered value in place for a retry
#[tokio::test]
async fn test_failed_save_keeps_form() {
    let mut projects = MockProjectApi::new();
    projects
        .expect_create_project()
        .times(1)
        .returning(|_| Err(ApiFailure::Network("connection refused".to_string())));

    let form = WizardFormState {
        name: "Clinic".to_string(),
        industry: Some(shared::Industry::Construction),
        project_type: Some(shared::ProjectType::Institutional),
        region: TestFixtures::REGION.to_string(),
        district: TestFixtures::DISTRICT.to_string(),
        ward: TestFixtures::WARD.to_string(),
        start_date: Some(TestFixtures::date("2025-01-06")),
        expected_completion_date: Some(TestFixtures::date("2025-12-19")),
        ..Default::default()
    };
    let mut wizard = ProjectWizard::from_draft(
        WizardMode::Create,
        form.clone(),
        StaticGeocodingGateway::default(),
        projects,
        MockSiteApi::new(),
        TestHelpers::converter(TestFixtures::USD_RATE),
    );
    assert!(wizard.advance_to_review());

    let status = wizard.submit().await;

    let SubmitStatus::Failed(message) = status else {
        panic!("expected failure, got {status:?}");
    };
    assert_eq!(message.kind, MessageKind::Network);
    assert_eq!(wizard.machine().form(), &form);
    assert!(!wizard.machine().is_finished());
}

/// Engineering roles list only registered engineers; other roles list everyone
#[tokio::test]
async fn test_team_candidates_follow_role_rules() {
    // Arrange
    let registered = TestFixtures::registered_engineer();
    let unregistered = TestFixtures::unregistered_engineer();
    let surveyor = TestFixtures::quantity_surveyor();
    let existing = TestFixtures::assignment(&surveyor, ProjectRole::QuantitySurveyor);
    let pool = vec![registered.clone(), unregistered.clone(), surveyor.clone()];

    let mut api = MockTeamApi::new();
    api.expect_get_project_team().returning(move |_| Ok(vec![existing.clone()]));
    api.expect_get_available_engineers().returning(move || Ok(pool.clone()));

    let mut screen = TeamScreen::new(TestFixtures::project_id(), api);
    screen.load().await.unwrap();
    screen.begin_add(TestFixtures::date("2025-02-03"));

    // Act
    screen.editor_mut().select_role(ProjectRole::SiteEngineer).unwrap();
    let engineers: Vec<_> = screen.editor().candidates().iter().map(|c| c.user.id).collect();

    screen.editor_mut().select_role(ProjectRole::Storekeeper).unwrap();
    let everyone = screen.editor().candidates();

    // Assert
    assert_eq!(engineers, vec![registered.id]);
    assert_eq!(everyone.len(), 3);
    assert!(everyone.iter().any(|c| c.user.id == surveyor.id && c.already_assigned));
    assert!(screen.editor_mut().select_user(surveyor.id).is_err());
}

/// The duplicate detour through the real client: 409 with warnings, then a
/// justified resubmission accepted by the server
#[tokio::test]
async fn test_request_duplicate_justification_over_http() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/material-requests"))
        .and(body_partial_json(json!({ "duplicateJustification": "Second pour needs more" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "9b2e7c1a-1d2f-4a3b-8c4d-5e6f7a8b9c0d" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/material-requests"))
        .respond_with(ResponseTemplate::new(409).set_body_json(TestFixtures::duplicate_conflict_body()))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri()).parse().unwrap();
    let api = RealProcurementApi::new(base, Some("test-token".to_string()));
    let mut screen = MaterialRequestScreen::new(TestFixtures::material_request(), api);

    // Act
    let first = screen.submit().await.unwrap();
    let rows = screen.resolver().unwrap().rows();
    screen.resolver_mut().unwrap().set_explanation("Second pour needs more");
    let second = screen.confirm_with_justification().await.unwrap();

    // Assert
    assert_eq!(first, SubmissionOutcome::NeedsJustification);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].overlap, "67%");
    assert_eq!(rows[0].status, "Approved");
    assert!(matches!(second, SubmissionOutcome::Accepted(_)));
    assert!(screen.resolver().is_none());
}
