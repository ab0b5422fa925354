//! Shared types for the event handling pipeline.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AuditError, DispatchError, NotifyError, RecipientError, RegistryError};
use crate::pipeline::event::{EventType, Recipient};

// ── Actions ─────────────────────────────────────────────────────────

/// A single thing the dispatcher may do for a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Suppress,
    Notify,
    Ignore,
}

/// The actions decided for one recipient.
///
/// Either `{Ignore}` alone, or a non-empty combination of `Suppress` and
/// `Notify`. Only the constants below can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSet {
    suppress: bool,
    notify: bool,
}

impl ActionSet {
    pub const IGNORE: Self = Self {
        suppress: false,
        notify: false,
    };
    pub const NOTIFY: Self = Self {
        suppress: false,
        notify: true,
    };
    pub const SUPPRESS_AND_NOTIFY: Self = Self {
        suppress: true,
        notify: true,
    };

    pub fn contains(&self, action: Action) -> bool {
        match action {
            Action::Suppress => self.suppress,
            Action::Notify => self.notify,
            Action::Ignore => self.is_ignore(),
        }
    }

    pub fn is_ignore(&self) -> bool {
        !self.suppress && !self.notify
    }

    /// Actions in the order the dispatcher applies them (suppress first).
    pub fn actions(&self) -> Vec<Action> {
        if self.is_ignore() {
            return vec![Action::Ignore];
        }
        let mut actions = Vec::with_capacity(2);
        if self.suppress {
            actions.push(Action::Suppress);
        }
        if self.notify {
            actions.push(Action::Notify);
        }
        actions
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match (self.suppress, self.notify) {
            (true, _) => "suppress+notify",
            (false, true) => "notify",
            (false, false) => "ignore",
        }
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reason code attached to a suppression registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuppressionReason {
    Bounce,
    /// Accepted by the registry but never produced by the decision table.
    Complaint,
}

impl SuppressionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bounce => "BOUNCE",
            Self::Complaint => "COMPLAINT",
        }
    }
}

impl fmt::Display for SuppressionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Plans and reports ───────────────────────────────────────────────

/// Decision for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientPlan {
    pub recipient: Recipient,
    pub actions: ActionSet,
}

/// Classifier output for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub event_type: EventType,
    /// Alert text describing the event (`Type=…, SubType=…` or `FeedbackType=…`).
    pub message: String,
    /// One entry per recipient, in payload order.
    pub recipients: Vec<RecipientPlan>,
}

impl ActionPlan {
    /// True when no recipient needs any side effect.
    pub fn is_noop(&self) -> bool {
        self.recipients.iter().all(|r| r.actions.is_ignore())
    }
}

/// What the dispatcher did for one event.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub event_type: EventType,
    /// Recipients successfully registered for suppression.
    pub suppressed: usize,
    /// Event alerts successfully sent.
    pub notified: usize,
    /// Recipients that needed no action.
    pub ignored: usize,
    /// Every recipient-level failure, in encounter order.
    pub errors: Vec<RecipientError>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn a report with failures into a single error carrying all of them.
    pub fn into_result(self) -> Result<Self, DispatchError> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(DispatchError {
                event_type: self.event_type.to_string(),
                failures: self.errors,
            })
        }
    }
}

// ── Collaborator traits ─────────────────────────────────────────────

/// Chat alert sink — pure I/O, no decision logic.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Alert about a classified event for one recipient.
    async fn notify_event(
        &self,
        event_type: EventType,
        message: &str,
        address: &str,
    ) -> Result<(), NotifyError>;

    /// Alert about an infrastructure failure.
    async fn notify_error(&self, message: &str) -> Result<(), NotifyError>;
}

/// Suppression registry — registration must be idempotent.
#[async_trait]
pub trait SuppressionRegistrar: Send + Sync {
    /// Registrar name for logging.
    fn name(&self) -> &str;

    async fn register(&self, address: &str, reason: SuppressionReason)
    -> Result<(), RegistryError>;
}

/// Sink for raw payloads, written before decoding.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, raw: &str) -> Result<(), AuditError>;
}
