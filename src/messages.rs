//! Message envelopes exchanged with upstream services
//!
//! Every message is a JSON object with a `head` (routing metadata) and a `body`. Callers
//! usually peek at `head.event_type` with [`get_event_type`] to decide how to handle a
//! payload, then decode the full message with [`convert`]. Neither helper is used by the
//! logging core.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("failed to decode message head: {0}")]
    Head(#[source] serde_json::Error),

    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Head {
    pub destination: String,
    /// Unix time in seconds
    pub time: i64,
    pub correlation_id: String,
    pub event_type: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    #[serde(default)]
    pub head: Head,
    #[serde(default)]
    pub body: T,
}

/// Envelope with an arbitrary JSON body
pub type UnstrictMessage = Message<serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContext {
    pub client_id: u64,
    pub firm_id: u64,
    pub instance_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendingMessageBody {
    pub context: MessageContext,
    pub message: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomingMessageBody {
    pub client_id: u64,
    pub company_id: u64,
    pub instance_id: u64,
    pub message: String,
    pub link: String,
}

pub type IncomingMessage = Message<IncomingMessageBody>;
pub type SendingMessage = Message<SendingMessageBody>;

#[derive(Deserialize)]
struct HeadOnly {
    #[serde(default)]
    head: Option<EventTypeOnly>,
}

#[derive(Deserialize)]
struct EventTypeOnly {
    #[serde(default)]
    event_type: Option<String>,
}

/// Extract `head.event_type` without validating the rest of the document
///
/// A missing or `null` `head` or `event_type` yields an empty string; only malformed JSON
/// (or a document that isn't an object) is an error.
///
/// ```
/// let raw = br#"{"head":{"event_type":"order.created","extra":1},"body":[1,2,3]}"#;
/// assert_eq!(unilog::messages::get_event_type(raw).unwrap(), "order.created");
/// ```
pub fn get_event_type(data: &[u8]) -> Result<String, MessageError> {
    let head_only: HeadOnly = serde_json::from_slice(data).map_err(MessageError::Head)?;
    Ok(head_only
        .head
        .and_then(|head| head.event_type)
        .unwrap_or_default())
}

/// Decode raw JSON into any target type
///
/// Envelope fields missing from the input take their default values.
pub fn convert<T: DeserializeOwned>(raw: &[u8]) -> Result<T, MessageError> {
    Ok(serde_json::from_slice(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCOMING: &str = r#"{
        "head": {
            "destination": "crm",
            "time": 1737547200,
            "correlation_id": "c-1",
            "event_type": "message.incoming",
            "source": "gateway"
        },
        "body": {
            "client_id": 1,
            "company_id": 2,
            "instance_id": 3,
            "message": "hello",
            "link": "https://example.invalid/m/1"
        }
    }"#;

    #[test]
    fn test_get_event_type_ignores_body() {
        let raw = br#"{"head":{"event_type":"ping"},"body":"not an object"}"#;
        assert_eq!(get_event_type(raw).unwrap(), "ping");
    }

    #[test]
    fn test_get_event_type_missing_field_is_empty() {
        assert_eq!(get_event_type(br#"{"head":{}}"#).unwrap(), "");
    }

    #[test]
    fn test_get_event_type_missing_or_null_head_is_empty() {
        assert_eq!(get_event_type(br#"{"body":1}"#).unwrap(), "");
        assert_eq!(get_event_type(br#"{"head":null}"#).unwrap(), "");
        assert_eq!(get_event_type(br#"{"head":{"event_type":null}}"#).unwrap(), "");
    }

    #[test]
    fn test_get_event_type_errors() {
        assert!(matches!(get_event_type(b"{oops"), Err(MessageError::Head(_))));
        assert!(matches!(get_event_type(b"42"), Err(MessageError::Head(_))));
        assert!(matches!(
            get_event_type(br#"{"head":"text"}"#),
            Err(MessageError::Head(_))
        ));
    }

    #[test]
    fn test_convert_typed_message() {
        let message: IncomingMessage = convert(INCOMING.as_bytes()).unwrap();
        assert_eq!(message.head.event_type, "message.incoming");
        assert_eq!(message.head.time, 1_737_547_200);
        assert_eq!(message.body.company_id, 2);
        assert_eq!(message.body.message, "hello");
    }

    #[test]
    fn test_convert_unstrict_and_sending() {
        let message: UnstrictMessage = convert(INCOMING.as_bytes()).unwrap();
        assert_eq!(message.body["link"], "https://example.invalid/m/1");

        let sending = SendingMessage {
            head: Head {
                event_type: "message.send".into(),
                ..Head::default()
            },
            body: SendingMessageBody {
                context: MessageContext {
                    client_id: 1,
                    firm_id: 9,
                    instance_id: 3,
                },
                message: serde_json::json!({"text": "hi"}),
            },
        };
        let raw = serde_json::to_vec(&sending).unwrap();
        assert_eq!(get_event_type(&raw).unwrap(), "message.send");
        assert_eq!(convert::<SendingMessage>(&raw).unwrap(), sending);
    }

    #[test]
    fn test_convert_fills_missing_envelope_fields() {
        let message: IncomingMessage =
            convert(br#"{"head":{"event_type":"x"},"body":{"client_id":1}}"#).unwrap();
        assert_eq!(message.head.event_type, "x");
        assert_eq!(message.head.destination, "");
        assert_eq!(message.body.client_id, 1);
        assert_eq!(message.body.link, "");

        let empty: SendingMessage = convert(b"{}").unwrap();
        assert_eq!(empty.body.context, MessageContext::default());
    }

    #[test]
    fn test_convert_type_mismatch() {
        assert!(matches!(
            convert::<IncomingMessage>(br#"{"head":{"time":"yesterday"}}"#),
            Err(MessageError::Decode(_))
        ));
    }
}
