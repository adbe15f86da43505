//! Test fixtures and data for frontend tests

use chrono::NaiveDate;
use serde_json::{json, Value};

use frontend::types::{MaterialLine, MaterialRequestDraft, ProjectRecord, SiteRecord, TeamAssignment, UserSummary};
use shared::{AssignmentId, ProjectId, ProjectRole, ResponsibilityLevel, SiteId, SystemRole, UserId};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const PROJECT_1: &'static str = "0f8fad5b-d9cb-469f-a165-70867728950e";
    pub const SITE_1: &'static str = "5c1e4a2f-3b7d-4e8a-9f10-2d3c4b5a6e70";
    pub const SITE_2: &'static str = "5c1e4a2f-3b7d-4e8a-9f10-2d3c4b5a6e71";

    pub const REGION: &'static str = "Dar es Salaam";
    pub const DISTRICT: &'static str = "Kinondoni";
    pub const WARD: &'static str = "Msasani";
    /// Table centre of the ward above
    pub const WARD_CENTER: &'static str = "-6.748800,39.274500";

    pub const USD_RATE: f64 = 2500.0;

    pub fn project_id() -> ProjectId {
        Self::PROJECT_1.parse().unwrap()
    }

    pub fn site_id_1() -> SiteId {
        Self::SITE_1.parse().unwrap()
    }

    pub fn site_id_2() -> SiteId {
        Self::SITE_2.parse().unwrap()
    }

    pub fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    pub fn project_record() -> ProjectRecord {
        ProjectRecord {
            id: Self::project_id(),
            name: "Msasani Clinic".to_string(),
            region: Self::REGION.to_string(),
            district: Self::DISTRICT.to_string(),
            ward: Self::WARD.to_string(),
            start_date: Some(Self::date("2025-01-06")),
            expected_completion_date: Some(Self::date("2025-12-19")),
            industry: Some(shared::Industry::Construction),
            project_type: Some(shared::ProjectType::Institutional),
            ..Default::default()
        }
    }

    pub fn site_records() -> Vec<SiteRecord> {
        vec![
            SiteRecord {
                id: Self::site_id_1(),
                project_id: Self::project_id(),
                name: "Main block".to_string(),
                budget_cap: Some(1_000_000.0),
                location: Some("Msasani, Kinondoni, Dar es Salaam".to_string()),
                gps_center: Some(Self::WARD_CENTER.to_string()),
            },
            SiteRecord {
                id: Self::site_id_2(),
                project_id: Self::project_id(),
                name: "Staff housing".to_string(),
                budget_cap: None,
                location: None,
                gps_center: None,
            },
        ]
    }

    pub fn registered_engineer() -> UserSummary {
        UserSummary {
            id: UserId::new(),
            full_name: "Zawadi Mrema".to_string(),
            email: "zawadi@example.co.tz".to_string(),
            role: SystemRole::Engineer,
            erb_number: Some("ERB-2291".to_string()),
            phone: None,
        }
    }

    pub fn unregistered_engineer() -> UserSummary {
        UserSummary {
            full_name: "Baraka Said".to_string(),
            email: "baraka@example.co.tz".to_string(),
            erb_number: None,
            id: UserId::new(),
            ..Self::registered_engineer()
        }
    }

    pub fn quantity_surveyor() -> UserSummary {
        UserSummary {
            full_name: "Neema Kileo".to_string(),
            email: "neema@example.co.tz".to_string(),
            role: SystemRole::QuantitySurveyor,
            erb_number: None,
            id: UserId::new(),
            ..Self::registered_engineer()
        }
    }

    pub fn assignment(user: &UserSummary, role: ProjectRole) -> TeamAssignment {
        TeamAssignment {
            id: AssignmentId::new(),
            user_id: user.id,
            user_name: user.full_name.clone(),
            role,
            responsibility_level: ResponsibilityLevel::Primary,
            start_date: Some(Self::date("2025-01-06")),
        }
    }

    pub fn material_request() -> MaterialRequestDraft {
        MaterialRequestDraft {
            project_id: Self::project_id(),
            site_id: Some(Self::site_id_1()),
            title: "Cement for columns".to_string(),
            boq_reference_code: Some("BOQ-12".to_string()),
            planned_start_date: Self::date("2025-03-01"),
            planned_end_date: Self::date("2025-03-20"),
            items: vec![MaterialLine { name: "Cement".to_string(), quantity: 120.0, unit: "bag".to_string() }],
            duplicate_justification: None,
        }
    }

    pub fn duplicate_conflict_body() -> Value {
        json!({
            "message": "Possible duplicate requests found",
            "duplicates": [{
                "requestId": "7a0d0a4e-6c53-4f1e-9a57-0c1c2d6f4a10",
                "requestTitle": "Cement for slab",
                "boqReferenceCode": "BOQ-12",
                "plannedStartDate": "2025-03-05",
                "plannedEndDate": "2025-03-25",
                "overlappingMaterials": ["Cement"],
                "timelineOverlapPercentage": 66.6,
                "status": "APPROVED",
                "siteName": "Main block"
            }]
        })
    }
}
