//! Synchronous state machines behind the screens
//!
//! Nothing here performs I/O. Async work is requested by returning a ticket
//! or a draft, and its result is fed back in by the screen that owns it.

pub mod currency;
pub mod duplicates;
pub mod feedback;
pub mod form;
pub mod linked;
pub mod machine;
pub mod payload;
pub mod pending;
pub mod sequencer;
pub mod sites;
pub mod team;
pub mod validation;

pub use currency::{parse_amount, CurrencyConverter, DEFAULT_USD_TZS_RATE};
pub use duplicates::{ConflictRow, DuplicateConflictResolver};
pub use feedback::{ActionContext, MessageKind, UserMessage};
pub use form::{FieldChange, FieldErrorMap, FormField, WizardFormState};
pub use machine::{GeocodeOutcome, GeocodeRequest, MapView, WizardMode, WizardStateMachine, WizardStep};
pub use payload::ProjectPayload;
pub use pending::{ActionTarget, ConfirmationGate, EntityKind, PendingAction};
pub use sequencer::{RequestGroup, RequestSequencer, Ticket};
pub use sites::{InitialSitePayload, SiteEntry, SiteField, SiteList};
pub use team::{AssignmentDraft, AssignmentFormError, Candidate, RoleRequirement, TeamAssignmentEditor};
