//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::SharedError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self, SharedError> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| SharedError::InvalidId { input: s.to_string() })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = SharedError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

entity_id!(
    /// Identifier of a project record on the server
    ProjectId
);
entity_id!(
    /// Identifier of a work site belonging to a project
    SiteId
);
entity_id!(
    /// Identifier of a system user
    UserId
);
entity_id!(
    /// Identifier of one user-to-project role assignment
    AssignmentId
);
entity_id!(
    /// Identifier of a material request
    RequestId
);

/// Latitude/longitude pair in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Dar es Salaam city centre, the map's resting position
    pub const DEFAULT_CENTER: Coordinates = Coordinates::new(-6.7924, 39.2083);
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for Coordinates {
    type Err = SharedError;

    /// Parses the "lat,lng" form used by the site and project records
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SharedError::InvalidCoordinates { input: s.to_string() };
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Self { lat, lng })
    }
}

/// Currencies a budget may be entered in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Canonical storage currency
    #[default]
    Tzs,
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Tzs => write!(f, "TZS"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Industry {
    Construction,
    Infrastructure,
    Energy,
    WaterAndSanitation,
    Telecommunications,
    Mining,
    Agriculture,
    Manufacturing,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    Residential,
    Commercial,
    Industrial,
    Institutional,
    Roads,
    Renovation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    #[default]
    LumpSum,
    Remeasurement,
    CostPlus,
    DesignAndBuild,
}

/// Role a user holds on one project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectRole {
    ProjectManager,
    SiteEngineer,
    ResidentEngineer,
    QuantitySurveyor,
    SiteSupervisor,
    Storekeeper,
    Foreman,
}

impl ProjectRole {
    pub const ALL: [ProjectRole; 7] = [
        ProjectRole::ProjectManager,
        ProjectRole::SiteEngineer,
        ProjectRole::ResidentEngineer,
        ProjectRole::QuantitySurveyor,
        ProjectRole::SiteSupervisor,
        ProjectRole::Storekeeper,
        ProjectRole::Foreman,
    ];

    /// Wire label, e.g. `SITE_ENGINEER`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::ProjectManager => "PROJECT_MANAGER",
            ProjectRole::SiteEngineer => "SITE_ENGINEER",
            ProjectRole::ResidentEngineer => "RESIDENT_ENGINEER",
            ProjectRole::QuantitySurveyor => "QUANTITY_SURVEYOR",
            ProjectRole::SiteSupervisor => "SITE_SUPERVISOR",
            ProjectRole::Storekeeper => "STOREKEEPER",
            ProjectRole::Foreman => "FOREMAN",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ProjectRole::ALL
            .into_iter()
            .find(|role| role.as_str() == label)
            .ok_or_else(|| SharedError::UnknownLabel {
                kind: "project role".to_string(),
                label: s.to_string(),
            })
    }
}

/// Account-level role of a user, as reported by the server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemRole {
    Admin,
    ProjectManager,
    Engineer,
    QuantitySurveyor,
    Supervisor,
    Storekeeper,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponsibilityLevel {
    #[default]
    Primary,
    Secondary,
    Support,
}
