//! Translation of API failures into the messages screens display
//!
//! No failure crosses a screen boundary untranslated: every persistence error
//! becomes a [`UserMessage`] and the screen keeps its state for a retry.

use shared::ApiFailure;
use thiserror::Error;

pub const NETWORK_MESSAGE: &str =
    "Unable to reach the server. Please check your internet connection and try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";
pub const INVALID_DATA_MESSAGE: &str = "Invalid data. Please check the form and try again.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const NOT_FOUND_MESSAGE: &str = "The requested record no longer exists.";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email address already exists.";
pub const DUPLICATE_ASSIGNMENT_MESSAGE: &str = "This user is already assigned to the project.";
pub const GENERIC_CONFLICT_MESSAGE: &str = "This change conflicts with existing data.";
pub const UNEXPECTED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Which action was being attempted; conflicts are explained per action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionContext {
    LoadData,
    SaveProject,
    SaveSite,
    DeleteSite,
    SaveTeamMember,
    RemoveTeamMember,
    CreateUser,
    UpdateUser,
    DeleteUser,
    AssignUser,
    RemoveMembership,
    SubmitRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Validation,
    Network,
    SessionExpired,
    PermissionDenied,
    InvalidData,
    NotFound,
    Conflict,
    Server,
    Unexpected,
}

/// Banner text shown to the user, tagged with its category
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{text}")]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Opaque transport text that still means "you are offline"
fn looks_like_network(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["network", "connection refused", "connection reset", "timed out", "dns error"]
        .iter()
        .any(|needle| lower.contains(needle))
}

impl UserMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn validation(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Validation, text)
    }

    pub fn from_failure(failure: &ApiFailure, context: ActionContext) -> Self {
        let server_text = failure.server_message().map(str::to_string);
        match failure {
            ApiFailure::Network(_) => Self::new(MessageKind::Network, NETWORK_MESSAGE),
            ApiFailure::Unauthorized => Self::new(MessageKind::SessionExpired, SESSION_EXPIRED_MESSAGE),
            ApiFailure::Forbidden => Self::new(MessageKind::PermissionDenied, PERMISSION_DENIED_MESSAGE),
            ApiFailure::BadRequest { .. } => Self::new(
                MessageKind::InvalidData,
                server_text.unwrap_or_else(|| INVALID_DATA_MESSAGE.to_string()),
            ),
            ApiFailure::NotFound => Self::new(MessageKind::NotFound, NOT_FOUND_MESSAGE),
            ApiFailure::Conflict { .. } => {
                let text = match context {
                    ActionContext::CreateUser => DUPLICATE_EMAIL_MESSAGE.to_string(),
                    ActionContext::AssignUser | ActionContext::SaveTeamMember => {
                        DUPLICATE_ASSIGNMENT_MESSAGE.to_string()
                    }
                    _ => server_text.unwrap_or_else(|| GENERIC_CONFLICT_MESSAGE.to_string()),
                };
                Self::new(MessageKind::Conflict, text)
            }
            ApiFailure::Server { .. } => Self::new(MessageKind::Server, SERVER_ERROR_MESSAGE),
            ApiFailure::Unexpected { message, .. } => match message {
                Some(text) if looks_like_network(text) => Self::new(MessageKind::Network, NETWORK_MESSAGE),
                _ => Self::new(MessageKind::Unexpected, UNEXPECTED_MESSAGE),
            },
            ApiFailure::Decode(text) if looks_like_network(text) => Self::new(MessageKind::Network, NETWORK_MESSAGE),
            ApiFailure::Decode(_) => Self::new(MessageKind::Unexpected, UNEXPECTED_MESSAGE),
        }
    }
}
