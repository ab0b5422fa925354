//! Pub/sub delivery envelopes.
//!
//! Events arrive either as a batch of records
//! (`{"Records": [{"Sns": {"Message": "…"}}]}`) or as a single HTTP push
//! (`{"Type": "Notification", "Message": "…"}`). Subscription handshakes
//! arrive on the same endpoint and carry no event.

use serde::Deserialize;

use crate::error::DecodeError;

/// A decoded delivery envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Raw event payloads, in delivery order.
    Records(Vec<String>),
    /// The topic asks the endpoint to confirm the subscription.
    SubscriptionConfirmation { subscribe_url: String },
    /// The subscription was removed.
    UnsubscribeConfirmation,
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    #[serde(rename = "Records")]
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Sns")]
    sns: RawMessage,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawPush {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "SubscribeURL", default)]
    subscribe_url: Option<String>,
}

/// Decode an envelope body.
pub fn decode_envelope(body: &str) -> Result<Envelope, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if value.get("Records").is_some() {
        let batch: RawBatch = serde_json::from_value(value)?;
        return Ok(Envelope::Records(
            batch.records.into_iter().map(|r| r.sns.message).collect(),
        ));
    }

    if value.get("Type").is_some() {
        let push: RawPush = serde_json::from_value(value)?;
        return match (push.kind.as_str(), push.message, push.subscribe_url) {
            ("Notification", Some(message), _) => Ok(Envelope::Records(vec![message])),
            ("SubscriptionConfirmation", _, Some(subscribe_url)) => {
                Ok(Envelope::SubscriptionConfirmation { subscribe_url })
            }
            ("UnsubscribeConfirmation", _, _) => Ok(Envelope::UnsubscribeConfirmation),
            (kind, _, _) => Err(DecodeError::UnsupportedEnvelope(format!(
                "push message of type {kind:?} is missing required fields or is not supported"
            ))),
        };
    }

    Err(DecodeError::UnsupportedEnvelope(
        "expected a \"Records\" batch or a \"Type\" push message".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_record_batch() {
        let body = r#"{
            "Records": [
                {"EventSource": "aws:sns", "Sns": {"Type": "Notification", "Message": "{\"eventType\":\"Bounce\"}"}},
                {"Sns": {"Message": "second"}}
            ]
        }"#;
        assert_eq!(
            decode_envelope(body).unwrap(),
            Envelope::Records(vec![r#"{"eventType":"Bounce"}"#.into(), "second".into()])
        );
    }

    #[test]
    fn decodes_push_notification() {
        let body = r#"{"Type": "Notification", "MessageId": "m-1", "Message": "payload"}"#;
        assert_eq!(
            decode_envelope(body).unwrap(),
            Envelope::Records(vec!["payload".into()])
        );
    }

    #[test]
    fn decodes_subscription_handshakes() {
        let body = r#"{"Type": "SubscriptionConfirmation", "SubscribeURL": "https://example.com/confirm"}"#;
        assert_eq!(
            decode_envelope(body).unwrap(),
            Envelope::SubscriptionConfirmation {
                subscribe_url: "https://example.com/confirm".into()
            }
        );
        assert_eq!(
            decode_envelope(r#"{"Type": "UnsubscribeConfirmation"}"#).unwrap(),
            Envelope::UnsubscribeConfirmation
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert!(matches!(
            decode_envelope(r#"{"hello": "world"}"#),
            Err(DecodeError::UnsupportedEnvelope(_))
        ));
        assert!(matches!(
            decode_envelope(r#"{"Type": "Notification"}"#),
            Err(DecodeError::UnsupportedEnvelope(_))
        ));
        assert!(matches!(
            decode_envelope(r#"{"Records": [{"Sns": {}}]}"#),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(decode_envelope("nope"), Err(DecodeError::Json(_))));
    }
}
