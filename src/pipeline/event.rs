//! Typed delivery events and the decoder that builds them from raw payloads.
//!
//! Only the fields needed to classify an event are extracted. Anything else
//! in the payload is ignored, and the raw text is kept by the audit log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::DecodeError;

// ── Event kinds ─────────────────────────────────────────────────────

/// Discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventType {
    Bounce,
    Complaint,
    #[default]
    Unknown,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bounce => "Bounce",
            Self::Complaint => "Complaint",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares a string-backed enum that keeps unrecognised values verbatim.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value this handler does not know about.
            Unrecognized(String),
        }

        impl $name {
            pub fn parse(raw: &str) -> Self {
                match raw {
                    $($wire => Self::$variant,)+
                    other => Self::Unrecognized(other.to_string()),
                }
            }

            /// The value as it appeared on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Bounce classification reported by the mail service.
    BounceType {
        Permanent => "Permanent",
        Transient => "Transient",
        Undetermined => "Undetermined",
    }
);

wire_enum!(
    /// Bounce sub-classification.
    BounceSubType {
        Undetermined => "Undetermined",
        General => "General",
        NoEmail => "NoEmail",
        Suppressed => "Suppressed",
        OnAccountSuppressionList => "OnAccountSuppressionList",
        MailboxFull => "MailboxFull",
        MessageTooLarge => "MessageTooLarge",
        ContentRejected => "ContentRejected",
        AttachmentRejected => "AttachmentRejected",
    }
);

wire_enum!(
    /// Complaint feedback type reported by the receiving mailbox provider.
    FeedbackType {
        Abuse => "abuse",
        AuthFailure => "auth-failure",
        Fraud => "fraud",
        NotSpam => "not-spam",
        Other => "other",
        Virus => "virus",
    }
);

/// A single address referenced by a bounce or complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email_address: String,
}

impl Recipient {
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BounceDetail {
    pub bounce_type: BounceType,
    pub bounce_sub_type: BounceSubType,
    pub recipients: Vec<Recipient>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintDetail {
    /// `None` when the provider did not report a feedback type.
    pub feedback_type: Option<FeedbackType>,
    pub recipients: Vec<Recipient>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A decoded delivery event.
///
/// The payload always matches the kind; an unknown kind carries only the
/// type name it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Bounce(BounceDetail),
    Complaint(ComplaintDetail),
    Unknown { event_type: String },
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Bounce(_) => EventType::Bounce,
            Self::Complaint(_) => EventType::Complaint,
            Self::Unknown { .. } => EventType::Unknown,
        }
    }

    pub fn recipients(&self) -> &[Recipient] {
        match self {
            Self::Bounce(detail) => &detail.recipients,
            Self::Complaint(detail) => &detail.recipients,
            Self::Unknown { .. } => &[],
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Bounce(detail) => detail.timestamp,
            Self::Complaint(detail) => detail.timestamp,
            Self::Unknown { .. } => None,
        }
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    event_type: String,
    #[serde(default)]
    bounce: Option<RawBounce>,
    #[serde(default)]
    complaint: Option<RawComplaint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBounce {
    #[serde(deserialize_with = "null_as_default")]
    bounce_type: String,
    #[serde(deserialize_with = "null_as_default")]
    bounce_sub_type: String,
    #[serde(deserialize_with = "null_as_default")]
    bounced_recipients: Vec<RawRecipient>,
    timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawComplaint {
    #[serde(deserialize_with = "null_as_default")]
    complained_recipients: Vec<RawRecipient>,
    complaint_feedback_type: Option<String>,
    timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRecipient {
    #[serde(deserialize_with = "null_as_default")]
    email_address: String,
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a raw event payload.
///
/// Unrecognised event types decode to [`Event::Unknown`]; only structural
/// problems (invalid JSON, missing or mistyped `eventType`, mistyped
/// sub-objects) are errors.
pub fn decode(raw: &str) -> Result<Event, DecodeError> {
    let raw: RawEvent = serde_json::from_str(raw)?;

    let event = match raw.event_type.as_str() {
        "Bounce" => {
            let bounce = raw.bounce.unwrap_or_default();
            Event::Bounce(BounceDetail {
                bounce_type: BounceType::parse(&bounce.bounce_type),
                bounce_sub_type: BounceSubType::parse(&bounce.bounce_sub_type),
                recipients: into_recipients(bounce.bounced_recipients),
                timestamp: parse_timestamp(bounce.timestamp.as_deref()),
            })
        }
        "Complaint" => {
            let complaint = raw.complaint.unwrap_or_default();
            Event::Complaint(ComplaintDetail {
                feedback_type: complaint
                    .complaint_feedback_type
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(FeedbackType::parse),
                recipients: into_recipients(complaint.complained_recipients),
                timestamp: parse_timestamp(complaint.timestamp.as_deref()),
            })
        }
        _ => Event::Unknown {
            event_type: raw.event_type,
        },
    };

    Ok(event)
}

fn into_recipients(raw: Vec<RawRecipient>) -> Vec<Recipient> {
    raw.into_iter()
        .map(|r| Recipient::new(r.email_address))
        .collect()
}

/// Timestamps are informational; an unparseable one is dropped, not fatal.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
