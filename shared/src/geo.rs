//! Static region → district → ward table
//!
//! Each level carries a representative coordinate so the map has somewhere
//! sensible to sit even before the geocoder answers.

use crate::errors::{SharedError, SharedResult};
use crate::types::Coordinates;

/// Suffix appended to every geocoding query
pub const DEFAULT_COUNTRY: &str = "Tanzania";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLevel {
    Region,
    District,
    Ward,
}

impl std::fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoLevel::Region => write!(f, "region"),
            GeoLevel::District => write!(f, "district"),
            GeoLevel::Ward => write!(f, "ward"),
        }
    }
}

#[derive(Debug)]
pub struct Ward {
    pub name: &'static str,
    pub center: Coordinates,
}

#[derive(Debug)]
pub struct District {
    pub name: &'static str,
    pub center: Coordinates,
    pub wards: &'static [Ward],
}

#[derive(Debug)]
pub struct Region {
    pub name: &'static str,
    pub center: Coordinates,
    pub districts: &'static [District],
}

const fn ward(name: &'static str, lat: f64, lng: f64) -> Ward {
    Ward { name, center: Coordinates::new(lat, lng) }
}

static TANZANIA: &[Region] = &[
    Region {
        name: "Dar es Salaam",
        center: Coordinates::new(-6.7924, 39.2083),
        districts: &[
            District {
                name: "Kinondoni",
                center: Coordinates::new(-6.7735, 39.2406),
                wards: &[
                    ward("Msasani", -6.7488, 39.2745),
                    ward("Mikocheni", -6.7610, 39.2490),
                    ward("Kawe", -6.7376, 39.2270),
                    ward("Mwananyamala", -6.7891, 39.2484),
                ],
            },
            District {
                name: "Ilala",
                center: Coordinates::new(-6.8250, 39.2600),
                wards: &[
                    ward("Kariakoo", -6.8186, 39.2770),
                    ward("Upanga West", -6.8090, 39.2856),
                    ward("Gerezani", -6.8278, 39.2797),
                ],
            },
            District {
                name: "Temeke",
                center: Coordinates::new(-6.8772, 39.2526),
                wards: &[
                    ward("Kurasini", -6.8511, 39.2842),
                    ward("Mbagala", -6.9050, 39.2700),
                    ward("Chang'ombe", -6.8580, 39.2660),
                ],
            },
            District {
                name: "Ubungo",
                center: Coordinates::new(-6.7856, 39.2050),
                wards: &[ward("Sinza", -6.7760, 39.2210), ward("Manzese", -6.7960, 39.2280)],
            },
        ],
    },
    Region {
        name: "Arusha",
        center: Coordinates::new(-3.3869, 36.6830),
        districts: &[
            District {
                name: "Arusha City",
                center: Coordinates::new(-3.3731, 36.6946),
                wards: &[
                    ward("Kaloleni", -3.3695, 36.6890),
                    ward("Sekei", -3.3620, 36.6780),
                    ward("Themi", -3.3830, 36.7030),
                ],
            },
            District {
                name: "Meru",
                center: Coordinates::new(-3.3370, 36.8940),
                wards: &[ward("Usa River", -3.3667, 36.8500), ward("Poli", -3.3000, 36.8200)],
            },
        ],
    },
    Region {
        name: "Dodoma",
        center: Coordinates::new(-6.1630, 35.7516),
        districts: &[
            District {
                name: "Dodoma City",
                center: Coordinates::new(-6.1722, 35.7395),
                wards: &[
                    ward("Makole", -6.1760, 35.7610),
                    ward("Kikuyu Kusini", -6.1850, 35.7460),
                    ward("Ipagala", -6.1920, 35.7800),
                ],
            },
            District {
                name: "Chamwino",
                center: Coordinates::new(-6.3350, 35.9900),
                wards: &[ward("Buigiri", -6.3000, 35.9900)],
            },
        ],
    },
    Region {
        name: "Mwanza",
        center: Coordinates::new(-2.5164, 32.9175),
        districts: &[
            District {
                name: "Nyamagana",
                center: Coordinates::new(-2.5200, 32.9000),
                wards: &[
                    ward("Mirongo", -2.5190, 32.9030),
                    ward("Igogo", -2.5320, 32.8920),
                    ward("Mkolani", -2.5700, 32.8700),
                ],
            },
            District {
                name: "Ilemela",
                center: Coordinates::new(-2.4900, 32.9300),
                wards: &[ward("Buswelu", -2.4550, 32.9750), ward("Kirumba", -2.5050, 32.9150)],
            },
        ],
    },
    Region {
        name: "Mbeya",
        center: Coordinates::new(-8.9094, 33.4608),
        districts: &[District {
            name: "Mbeya City",
            center: Coordinates::new(-8.9000, 33.4500),
            wards: &[ward("Iyela", -8.9130, 33.4890), ward("Sisimba", -8.9070, 33.4570)],
        }],
    },
];

/// Read-only view over the geography table
#[derive(Debug, Clone, Copy)]
pub struct GeoHierarchy {
    regions: &'static [Region],
}

impl Default for GeoHierarchy {
    fn default() -> Self {
        Self::tanzania()
    }
}

impl GeoHierarchy {
    pub const fn tanzania() -> Self {
        Self { regions: TANZANIA }
    }

    pub fn regions(&self) -> impl Iterator<Item = &'static str> {
        self.regions.iter().map(|r| r.name)
    }

    /// Districts of a region; empty when the region is unknown or blank
    pub fn districts(&self, region: &str) -> Vec<&'static str> {
        self.region(region)
            .map(|r| r.districts.iter().map(|d| d.name).collect())
            .unwrap_or_default()
    }

    /// Wards of a district; empty unless both parents resolve
    pub fn wards(&self, region: &str, district: &str) -> Vec<&'static str> {
        self.district(region, district)
            .map(|d| d.wards.iter().map(|w| w.name).collect())
            .unwrap_or_default()
    }

    pub fn region(&self, name: &str) -> Option<&'static Region> {
        self.regions.iter().find(|r| r.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn district(&self, region: &str, district: &str) -> Option<&'static District> {
        self.region(region)?
            .districts
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(district.trim()))
    }

    pub fn ward(&self, region: &str, district: &str, ward: &str) -> Option<&'static Ward> {
        self.district(region, district)?
            .wards
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(ward.trim()))
    }

    /// Coordinates of the most specific level that resolves
    pub fn locate(&self, region: &str, district: &str, ward: &str) -> Option<Coordinates> {
        if let Some(w) = self.ward(region, district, ward) {
            return Some(w.center);
        }
        if let Some(d) = self.district(region, district) {
            return Some(d.center);
        }
        self.region(region).map(|r| r.center)
    }

    /// Checks that each non-blank level is contained by its parent
    pub fn check_selection(&self, region: &str, district: &str, ward: &str) -> SharedResult<()> {
        let unknown = |level: GeoLevel, name: &str| SharedError::UnknownGeography {
            level: level.to_string(),
            name: name.to_string(),
        };
        if region.trim().is_empty() {
            return Ok(());
        }
        self.region(region).ok_or_else(|| unknown(GeoLevel::Region, region))?;
        if district.trim().is_empty() {
            return Ok(());
        }
        self.district(region, district).ok_or_else(|| unknown(GeoLevel::District, district))?;
        if ward.trim().is_empty() {
            return Ok(());
        }
        self.ward(region, district, ward).ok_or_else(|| unknown(GeoLevel::Ward, ward))?;
        Ok(())
    }
}

/// Builds the free-text geocoding query for the most specific selected level.
///
/// A level only counts when all of its ancestors are selected too.
pub fn geocode_query(region: &str, district: &str, ward: &str, country: &str) -> Option<(GeoLevel, String)> {
    let (region, district, ward) = (region.trim(), district.trim(), ward.trim());
    if region.is_empty() {
        return None;
    }
    if !district.is_empty() && !ward.is_empty() {
        return Some((GeoLevel::Ward, format!("{ward}, {district}, {region}, {country}")));
    }
    if !district.is_empty() {
        return Some((GeoLevel::District, format!("{district}, {region}, {country}")));
    }
    Some((GeoLevel::Region, format!("{region}, {country}")))
}
