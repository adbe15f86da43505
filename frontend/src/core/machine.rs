//! Five-step project wizard state machine
//!
//! Pure state: no I/O happens here. Geography edits hand back a
//! [`GeocodeRequest`] that the caller resolves and feeds back through
//! [`WizardStateMachine::apply_geocode`]; submission hands back a
//! [`ProjectPayload`] for the caller to persist.

use std::fmt;

use shared::{geocode_query, Coordinates, GeoHierarchy, GeoLevel, ProjectId, SiteId, DEFAULT_COUNTRY};

use crate::core::currency::CurrencyConverter;
use crate::core::feedback::UserMessage;
use crate::core::form::{FieldChange, FieldErrorMap, FormField, WizardFormState};
use crate::core::linked::default_site_location;
use crate::core::payload::ProjectPayload;
use crate::core::sequencer::{RequestGroup, RequestSequencer, Ticket};
use crate::core::sites::SiteField;
use crate::core::validation::{validate_for_submit, validate_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Identity = 1,
    Location = 2,
    OwnerTimelineContract = 3,
    Context = 4,
    Review = 5,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Identity;
    pub const LAST: WizardStep = WizardStep::Review;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Identity),
            2 => Some(WizardStep::Location),
            3 => Some(WizardStep::OwnerTimelineContract),
            4 => Some(WizardStep::Context),
            5 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Project Identity",
            WizardStep::Location => "Location",
            WizardStep::OwnerTimelineContract => "Owner, Timeline & Contract",
            WizardStep::Context => "Context",
            WizardStep::Review => "Review",
        }
    }

    fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::LAST)
    }

    fn previous(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::FIRST)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit(ProjectId),
}

/// Where the map is centred and where its marker sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub marker: Option<Coordinates>,
}

impl Default for MapView {
    fn default() -> Self {
        Self { center: Coordinates::DEFAULT_CENTER, marker: None }
    }
}

/// Lookup the caller must resolve after a geography edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub ticket: Ticket,
    pub level: GeoLevel,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeOutcome {
    Applied,
    NoMatch,
    /// A newer lookup was issued after this one; the answer was dropped
    Stale,
}

pub const STEP_INVALID_MESSAGE: &str = "Please fix the highlighted fields before continuing.";
pub const NOT_ON_REVIEW_MESSAGE: &str = "Review the project on the last step before submitting.";

pub struct WizardStateMachine {
    mode: WizardMode,
    step: WizardStep,
    form: WizardFormState,
    errors: FieldErrorMap,
    general_error: Option<String>,
    map: MapView,
    /// Set once the user types into the default site's own GPS field
    default_gps_overridden: bool,
    hydrated_site_ids: Vec<SiteId>,
    geocoding: RequestSequencer,
    geo: GeoHierarchy,
    country: String,
    finished: bool,
}

impl WizardStateMachine {
    pub fn new_create() -> Self {
        Self::with_form(WizardMode::Create, WizardFormState::default())
    }

    /// Starts on step 1 with data fetched for an existing project
    pub fn new_edit(project_id: ProjectId, form: WizardFormState) -> Self {
        Self::with_form(WizardMode::Edit(project_id), form)
    }

    /// Reopens a saved draft on step 1
    pub fn from_draft(mode: WizardMode, form: WizardFormState) -> Self {
        Self::with_form(mode, form)
    }

    fn with_form(mode: WizardMode, form: WizardFormState) -> Self {
        let map = match form.gps_coordinates {
            Some(c) => MapView { center: c, marker: Some(c) },
            None => MapView::default(),
        };
        Self {
            mode,
            step: WizardStep::FIRST,
            hydrated_site_ids: form.initial_sites.persisted_ids(),
            form,
            errors: FieldErrorMap::new(),
            general_error: None,
            map,
            default_gps_overridden: false,
            geocoding: RequestSequencer::new(),
            geo: GeoHierarchy::tanzania(),
            country: DEFAULT_COUNTRY.to_string(),
            finished: false,
        }
    }

    /// Country appended to every geocoding query
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &WizardFormState {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrorMap {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn map(&self) -> MapView {
        self.map
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Applies one field edit.
    ///
    /// The edited field's error is cleared immediately. A geography edit
    /// re-derives the default site's location and returns the lookup to run.
    /// A district or ward outside the selected parent is refused and left
    /// as a field error.
    pub fn handle_change(&mut self, change: FieldChange) -> Option<GeocodeRequest> {
        let field = change.field();
        self.errors.clear_field(field);

        if let Err(message) = self.check_geography(&change) {
            self.errors.insert(field, message);
            return None;
        }

        let changed = self.form.apply(change);
        if !changed || !field.is_geography() {
            return None;
        }

        self.sync_default_site_location();

        let Some((level, query)) =
            geocode_query(&self.form.region, &self.form.district, &self.form.ward, &self.country)
        else {
            // Nothing to look up: retire any lookup still in flight
            self.geocoding.invalidate(RequestGroup::Geocoding);
            return None;
        };
        let ticket = self.geocoding.issue(RequestGroup::Geocoding);
        Some(GeocodeRequest { ticket, level, query })
    }

    /// Each geography level must be a child of the level above it.
    /// Clearing a level is always allowed.
    fn check_geography(&self, change: &FieldChange) -> Result<(), String> {
        let form = &self.form;
        let checked = match change {
            FieldChange::Region(region) if !region.trim().is_empty() => self.geo.check_selection(region, "", ""),
            FieldChange::District(district) if !district.trim().is_empty() => {
                if form.region.trim().is_empty() {
                    return Err("Select a region first".to_string());
                }
                self.geo.check_selection(&form.region, district, "")
            }
            FieldChange::Ward(ward) if !ward.trim().is_empty() => {
                if form.district.trim().is_empty() {
                    return Err("Select a district first".to_string());
                }
                self.geo.check_selection(&form.region, &form.district, ward)
            }
            _ => Ok(()),
        };
        checked.map_err(|e| e.to_string())
    }

    /// Linked-field rule: while a ward is selected the default site's
    /// location always mirrors "ward, district, region", even over edits
    /// the user made to that site.
    fn sync_default_site_location(&mut self) {
        if let Some(location) = default_site_location(&self.form.region, &self.form.district, &self.form.ward) {
            self.form.initial_sites = self.form.initial_sites.with_update(0, SiteField::Location, location);
        }
    }

    /// Feeds a geocoding answer back in. Only the newest lookup is applied.
    pub fn apply_geocode(&mut self, ticket: Ticket, result: Option<Coordinates>) -> GeocodeOutcome {
        if !self.geocoding.is_current(ticket) {
            return GeocodeOutcome::Stale;
        }
        let Some(coords) = result else {
            return GeocodeOutcome::NoMatch;
        };

        self.map = MapView { center: coords, marker: Some(coords) };
        self.form.gps_coordinates = Some(coords);
        self.errors.clear_field(FormField::GpsCoordinates);
        if !self.default_gps_overridden {
            self.form.initial_sites =
                self.form.initial_sites.with_update(0, SiteField::GpsCenter, coords.to_string());
        }
        GeocodeOutcome::Applied
    }

    /// A point picked on the map wins over any geocoded value, including
    /// one still in flight.
    pub fn select_map_point(&mut self, coords: Coordinates) {
        self.geocoding.invalidate(RequestGroup::Geocoding);
        self.map = MapView { center: coords, marker: Some(coords) };
        self.form.gps_coordinates = Some(coords);
        self.form.initial_sites = self.form.initial_sites.with_update(0, SiteField::GpsCenter, coords.to_string());
    }

    pub fn add_site(&mut self) {
        self.form.initial_sites = self.form.initial_sites.with_added();
    }

    /// Returns false when the removal was refused (last remaining site)
    pub fn remove_site(&mut self, index: usize) -> bool {
        let before = self.form.initial_sites.len();
        self.form.initial_sites = self.form.initial_sites.without(index);
        if index == 0 && self.form.initial_sites.len() < before {
            self.default_gps_overridden = false;
        }
        self.form.initial_sites.len() < before
    }

    pub fn update_site(&mut self, index: usize, field: SiteField, value: impl Into<String>) {
        if index == 0 && field == SiteField::GpsCenter {
            self.default_gps_overridden = true;
        }
        self.form.initial_sites = self.form.initial_sites.with_update(index, field, value);
    }

    /// Validates the current step and advances on success
    pub fn next(&mut self) -> bool {
        let errors = validate_step(&self.form, self.step);
        if !errors.is_empty() {
            self.errors = errors;
            self.general_error = Some(STEP_INVALID_MESSAGE.to_string());
            return false;
        }
        self.errors.clear();
        self.general_error = None;
        self.step = self.step.next();
        true
    }

    /// Steps back without re-validating the step being left
    pub fn previous(&mut self) {
        self.step = self.step.previous();
        self.errors.clear();
        self.general_error = None;
    }

    /// Re-validates steps 1–3 and, when they pass, builds the payload to
    /// persist. Only the Review step submits. On failure the errors are
    /// recorded and `None` is returned.
    pub fn prepare_submission(&mut self, converter: &CurrencyConverter) -> Option<ProjectPayload> {
        if self.step != WizardStep::Review {
            self.general_error = Some(NOT_ON_REVIEW_MESSAGE.to_string());
            return None;
        }
        let (failing, errors) = validate_for_submit(&self.form);
        if !failing.is_empty() {
            let steps: Vec<&str> = failing.iter().map(|s| s.title()).collect();
            self.errors = errors;
            self.general_error = Some(format!(
                "Please complete the required fields in: {}.",
                steps.join(", ")
            ));
            return None;
        }
        self.errors.clear();
        self.general_error = None;
        Some(ProjectPayload::from_form(&self.form, converter))
    }

    /// Records a failed persistence call; the entered data stays as it was
    pub fn submission_failed(&mut self, message: &UserMessage) {
        self.general_error = Some(message.text.clone());
    }

    /// Ends the machine after a successful submission
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Sites loaded from the server that the user has since removed
    pub fn removed_site_ids(&self) -> Vec<SiteId> {
        let current = self.form.initial_sites.persisted_ids();
        self.hydrated_site_ids
            .iter()
            .copied()
            .filter(|id| !current.contains(id))
            .collect()
    }
}
