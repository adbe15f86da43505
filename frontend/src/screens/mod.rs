//! Async screen controllers
//!
//! Each screen owns its state machine and the API handles it needs, and
//! reports failures as a [`UserMessage`](crate::core::UserMessage) banner.

pub mod project_wizard;
pub mod request_submission;
pub mod site_manager;
pub mod team_screen;
pub mod user_directory;

pub use project_wizard::{ProjectWizard, SubmitStatus};
pub use request_submission::{MaterialRequestScreen, SubmissionOutcome};
pub use site_manager::{SiteDraft, SiteDraftError, SiteManager};
pub use team_screen::TeamScreen;
pub use user_directory::{InitialAssignment, NewUserForm, UserDirectory};
