//! Static decision table mapping event attributes to per-recipient actions.
//!
//! Only permanent bounces that point at an address that cannot exist
//! (`General`, `NoEmail`) are suppressed automatically. Every other
//! recognised outcome is surfaced as an alert so a human can decide whether
//! to suppress it by hand.
//!
//! Anything not listed in a table classifies to `Ignore`.

use tracing::debug;

use crate::pipeline::event::{
    BounceDetail, BounceSubType, BounceType, ComplaintDetail, Event, FeedbackType,
};
use crate::pipeline::types::{ActionPlan, ActionSet, RecipientPlan};

/// `(bounceType, bounceSubType) → actions`.
pub const BOUNCE_RULES: &[(BounceType, BounceSubType, ActionSet)] = &[
    (BounceType::Undetermined, BounceSubType::Undetermined, ActionSet::NOTIFY),
    (BounceType::Permanent, BounceSubType::General, ActionSet::SUPPRESS_AND_NOTIFY),
    (BounceType::Permanent, BounceSubType::NoEmail, ActionSet::SUPPRESS_AND_NOTIFY),
    (BounceType::Permanent, BounceSubType::Suppressed, ActionSet::NOTIFY),
    (BounceType::Permanent, BounceSubType::OnAccountSuppressionList, ActionSet::NOTIFY),
    (BounceType::Transient, BounceSubType::General, ActionSet::NOTIFY),
    (BounceType::Transient, BounceSubType::MailboxFull, ActionSet::NOTIFY),
    (BounceType::Transient, BounceSubType::MessageTooLarge, ActionSet::NOTIFY),
    (BounceType::Transient, BounceSubType::ContentRejected, ActionSet::NOTIFY),
    (BounceType::Transient, BounceSubType::AttachmentRejected, ActionSet::NOTIFY),
];

/// `complaintFeedbackType → actions`.
pub const COMPLAINT_RULES: &[(FeedbackType, ActionSet)] = &[
    (FeedbackType::Abuse, ActionSet::NOTIFY),
    (FeedbackType::AuthFailure, ActionSet::NOTIFY),
    (FeedbackType::Fraud, ActionSet::NOTIFY),
    (FeedbackType::NotSpam, ActionSet::NOTIFY),
    (FeedbackType::Other, ActionSet::NOTIFY),
    (FeedbackType::Virus, ActionSet::NOTIFY),
];

/// Look up a bounce combination. Unlisted pairs, including any
/// `Unrecognized` value, are `Ignore`.
pub fn bounce_actions(bounce_type: &BounceType, bounce_sub_type: &BounceSubType) -> ActionSet {
    BOUNCE_RULES
        .iter()
        .find(|(t, s, _)| t == bounce_type && s == bounce_sub_type)
        .map(|(_, _, actions)| *actions)
        .unwrap_or(ActionSet::IGNORE)
}

/// Look up a complaint feedback type. Absent or unlisted values are `Ignore`.
pub fn complaint_actions(feedback_type: Option<&FeedbackType>) -> ActionSet {
    feedback_type
        .and_then(|ft| COMPLAINT_RULES.iter().find(|(key, _)| key == ft))
        .map(|(_, actions)| *actions)
        .unwrap_or(ActionSet::IGNORE)
}

/// Classify an event into a per-recipient action plan.
///
/// Pure and deterministic: no I/O, the same event always yields the same plan.
pub fn classify(event: &Event) -> ActionPlan {
    let (message, actions) = match event {
        Event::Bounce(detail) => classify_bounce(detail),
        Event::Complaint(detail) => classify_complaint(detail),
        Event::Unknown { .. } => (String::new(), ActionSet::IGNORE),
    };

    debug!(
        event_type = %event.event_type(),
        actions = %actions,
        recipients = event.recipients().len(),
        "Classified event"
    );

    ActionPlan {
        event_type: event.event_type(),
        message,
        recipients: event
            .recipients()
            .iter()
            .map(|recipient| RecipientPlan {
                recipient: recipient.clone(),
                actions,
            })
            .collect(),
    }
}

fn classify_bounce(detail: &BounceDetail) -> (String, ActionSet) {
    let message = format!(
        "Type={}, SubType={}",
        detail.bounce_type, detail.bounce_sub_type
    );
    let actions = bounce_actions(&detail.bounce_type, &detail.bounce_sub_type);
    (message, actions)
}

fn classify_complaint(detail: &ComplaintDetail) -> (String, ActionSet) {
    let feedback = detail.feedback_type.as_ref();
    let message = format!(
        "FeedbackType={}",
        feedback.map(FeedbackType::as_str).unwrap_or_default()
    );
    (message, complaint_actions(feedback))
}
