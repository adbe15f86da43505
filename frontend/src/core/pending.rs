//! Two-phase confirmation for destructive actions
//!
//! Every screen that deletes something funnels through a single
//! [`ConfirmationGate`]: request, then confirm or cancel.

use std::fmt;

use shared::{AssignmentId, ProjectId, SiteId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Site,
    TeamMember,
    User,
    Membership,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Site => "site",
            EntityKind::TeamMember => "team member",
            EntityKind::User => "user",
            EntityKind::Membership => "project membership",
        };
        write!(f, "{name}")
    }
}

/// What a destructive action would delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTarget {
    Site(SiteId),
    TeamMember { project: ProjectId, assignment: AssignmentId },
    User(UserId),
    Membership { user: UserId, project: ProjectId },
}

impl ActionTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            ActionTarget::Site(_) => EntityKind::Site,
            ActionTarget::TeamMember { .. } => EntityKind::TeamMember,
            ActionTarget::User(_) => EntityKind::User,
            ActionTarget::Membership { .. } => EntityKind::Membership,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub target: ActionTarget,
    /// Human name of the target, e.g. the user's full name
    pub label: String,
}

impl PendingAction {
    pub fn kind(&self) -> EntityKind {
        self.target.kind()
    }

    pub fn prompt(&self) -> String {
        match self.kind() {
            EntityKind::Membership => format!("Remove {} from this project?", self.label),
            kind => format!("Delete {kind} \"{}\"? This cannot be undone.", self.label),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationGate {
    pending: Option<PendingAction>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any earlier pending action
    pub fn request(&mut self, target: ActionTarget, label: impl Into<String>) {
        self.pending = Some(PendingAction { target, label: label.into() });
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn prompt(&self) -> Option<String> {
        self.pending.as_ref().map(PendingAction::prompt)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Releases the pending action for execution
    pub fn confirm(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
