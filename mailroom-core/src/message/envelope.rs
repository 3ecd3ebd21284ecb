/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt::{self, Debug, Display, Formatter};
use std::iter;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::message::{ErrorMessage, HandlerError, MessageFactory, MessageKind, Payload};

/// Wire keys reserved for the header; payload fields never use them.
pub(crate) const HEADER_KEYS: [&str; 7] = [
    "type",
    "code",
    "messageId",
    "traceId",
    "createdAt",
    "reason",
    "reasonId",
];

/// Wire key holding a payload that does not serialize to a JSON object.
pub(crate) const DATA_KEY: &str = "data";

/// An immutable message: a header plus a typed payload.
///
/// Cloning a `Message` is cheap and yields the same message (same id, same payload
/// allocation). Equality compares message ids.
#[derive(Clone)]
pub struct Message(Arc<MessageInner>);

struct MessageInner {
    message_id: String,
    trace_id: Option<String>,
    created_at: DateTime<Utc>,
    reason: Option<Message>,
    reason_id: Option<String>,
    payload: Box<dyn Payload>,
}

impl Message {
    /// Wraps a payload in a fresh header (new id, current time, no reason).
    pub fn new<T: MessageKind>(payload: T) -> Self {
        Self::builder(payload).build()
    }

    /// Starts building a message around `payload`.
    pub fn builder<T: MessageKind>(payload: T) -> MessageBuilder {
        MessageBuilder::from_payload(Box::new(payload))
    }

    /// Unique id of this message.
    pub fn id(&self) -> &str {
        &self.0.message_id
    }

    /// Routing code of the payload type.
    pub fn code(&self) -> &'static str {
        self.0.payload.code()
    }

    /// Display name of the payload type.
    pub fn name(&self) -> &'static str {
        self.0.payload.name()
    }

    /// Trace id, explicit or inherited from the reason.
    pub fn trace_id(&self) -> Option<&str> {
        self.0.trace_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// The message that caused this one, when it was materialized.
    pub fn reason(&self) -> Option<&Message> {
        self.0.reason.as_ref()
    }

    /// Id of the causing message, whether or not it was materialized.
    pub fn reason_id(&self) -> Option<&str> {
        self.0
            .reason_id
            .as_deref()
            .or_else(|| self.0.reason.as_ref().map(Message::id))
    }

    /// Walks the reason chain, nearest cause first.
    pub fn reasons(&self) -> impl Iterator<Item = &Message> {
        iter::successors(self.reason(), |message| message.reason())
    }

    /// The type-erased payload.
    pub fn payload_dyn(&self) -> &dyn Payload {
        self.0.payload.as_ref()
    }

    /// Downcasts the payload to `T`.
    pub fn payload<T: MessageKind>(&self) -> Option<&T> {
        self.0.payload.as_any().downcast_ref::<T>()
    }

    /// True when the payload's code is `T::CODE`.
    pub fn is<T: MessageKind>(&self) -> bool {
        self.code() == T::CODE
    }

    /// The error carried by an [`ErrorMessage`], if this is one.
    pub fn error(&self) -> Option<&HandlerError> {
        self.payload::<ErrorMessage>().map(|failure| &failure.error)
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Message) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Produces the JSON wire shape: header keys plus the payload fields.
    ///
    /// Fails when a payload field would overwrite a header key; `#[mailroom_message]`
    /// rejects such fields at compile time.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.name()));
        map.insert("code".into(), Value::from(self.code()));
        map.insert("messageId".into(), Value::from(self.id()));
        if let Some(trace_id) = self.trace_id() {
            map.insert("traceId".into(), Value::from(trace_id));
        }
        map.insert(
            "createdAt".into(),
            Value::from(self.created_at().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        if let Some(reason) = self.reason() {
            map.insert("reason".into(), reason.to_json()?);
        }
        if let Some(reason_id) = self.reason_id() {
            map.insert("reasonId".into(), Value::from(reason_id));
        }

        match self.0.payload.to_value()? {
            Value::Object(fields) => {
                for (key, value) in fields {
                    if HEADER_KEYS.contains(&key.as_str()) {
                        return Err(ser::Error::custom(format!(
                            "{} ({}): payload field `{key}` collides with a header key",
                            self.name(),
                            self.code()
                        )));
                    }
                    map.insert(key, value);
                }
            }
            Value::Null => {}
            other => {
                map.insert(DATA_KEY.into(), other);
            }
        }
        Ok(Value::Object(map))
    }
}

impl<T: MessageKind> From<T> for Message {
    fn from(payload: T) -> Self {
        Message::new(payload)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Message {}

impl Debug for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("type", &self.name())
            .field("code", &self.code())
            .field("message_id", &self.id())
            .field("trace_id", &self.trace_id())
            .field("reason_id", &self.reason_id())
            .field("payload", &self.0.payload)
            .finish()
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        MessageFactory::create(raw).map_err(de::Error::custom)
    }
}

/// Builds a [`Message`] with explicit header fields.
///
/// Anything left unset gets its default: a UUID v4 id, the current time, and the
/// reason's trace id.
pub struct MessageBuilder {
    payload: Box<dyn Payload>,
    message_id: Option<String>,
    trace_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    reason: Option<Message>,
    reason_id: Option<String>,
}

impl MessageBuilder {
    pub(crate) fn from_payload(payload: Box<dyn Payload>) -> Self {
        Self {
            payload,
            message_id: None,
            trace_id: None,
            created_at: None,
            reason: None,
            reason_id: None,
        }
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Records `reason` as the cause of the message being built.
    pub fn reason(mut self, reason: &Message) -> Self {
        self.reason = Some(reason.clone());
        self
    }

    pub(crate) fn maybe_reason(mut self, reason: Option<Message>) -> Self {
        self.reason = reason;
        self
    }

    /// References a cause that is not materialized.
    pub fn reason_id(mut self, reason_id: impl Into<String>) -> Self {
        self.reason_id = Some(reason_id.into());
        self
    }

    pub fn build(self) -> Message {
        let trace_id = self.trace_id.or_else(|| {
            self.reason
                .as_ref()
                .and_then(|reason| reason.trace_id().map(String::from))
        });
        Message(Arc::new(MessageInner {
            message_id: self
                .message_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            trace_id,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            reason: self.reason,
            reason_id: self.reason_id,
            payload: self.payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::prelude::*;

    #[mailroom_message(code = "test.envelope.note")]
    struct Note {
        text: String,
    }

    #[mailroom_message(code = "test.envelope.tick")]
    struct Tick;

    #[mailroom_message(code = "test.envelope.amount")]
    struct Amount(u32);

    #[test]
    fn new_message_gets_an_id_and_no_reason() {
        let message = Message::new(Tick);
        assert!(!message.id().is_empty());
        assert!(message.reason().is_none());
        assert!(message.reason_id().is_none());
        assert!(message.trace_id().is_none());
        assert_eq!(message.code(), "test.envelope.tick");
        assert_eq!(message.name(), "Tick");
    }

    #[test]
    fn clones_share_identity() {
        let message = Message::new(Tick);
        let copy = message.clone();
        assert!(message.ptr_eq(&copy));
        assert_eq!(message, copy);
        assert_ne!(message, Message::new(Tick));
    }

    #[test]
    fn trace_id_is_inherited_from_the_reason() {
        let root = Message::builder(Tick).trace_id("trace-1").build();
        let child = Message::builder(Tick).reason(&root).build();
        let grandchild = Message::builder(Tick).reason(&child).build();
        assert_eq!(child.trace_id(), Some("trace-1"));
        assert_eq!(grandchild.trace_id(), Some("trace-1"));
        assert_eq!(grandchild.reason_id(), Some(child.id()));
        assert_eq!(grandchild.reasons().count(), 2);

        let overridden = Message::builder(Tick)
            .reason(&root)
            .trace_id("trace-2")
            .build();
        assert_eq!(overridden.trace_id(), Some("trace-2"));
    }

    #[test]
    fn payload_downcasts_only_to_its_own_type() {
        let message = Message::new(Note {
            text: "hello".into(),
        });
        assert_eq!(
            message.payload::<Note>().map(|note| note.text.as_str()),
            Some("hello")
        );
        assert!(message.payload::<Tick>().is_none());
        assert!(message.is::<Note>());
        assert!(!message.is::<Tick>());
    }

    #[test]
    fn json_flattens_payload_fields_next_to_the_header() {
        let reason = Message::builder(Tick).message_id("r-1").build();
        let message = Message::builder(Note { text: "hi".into() })
            .message_id("m-1")
            .reason(&reason)
            .build();

        let json = message.to_json().expect("serializable");
        assert_eq!(json["code"], json!("test.envelope.note"));
        assert_eq!(json["type"], json!("Note"));
        assert_eq!(json["messageId"], json!("m-1"));
        assert_eq!(json["text"], json!("hi"));
        assert_eq!(json["reasonId"], json!("r-1"));
        assert_eq!(json["reason"]["code"], json!("test.envelope.tick"));
        assert!(json.get("traceId").is_none());
        assert!(json["createdAt"].is_string());
    }

    /// Implemented by hand, so nothing checked its field names at compile time.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Shipment {
        r#type: String,
        weight: u32,
    }

    impl MessageKind for Shipment {
        const CODE: &'static str = "test.envelope.shipment";
        const NAME: &'static str = "Shipment";
    }

    #[test]
    fn payload_fields_may_not_shadow_header_keys() {
        let message = Message::new(Shipment {
            r#type: "crate".into(),
            weight: 3,
        });

        let error = message.to_json().expect_err("`type` is a header key");
        assert!(error.to_string().contains("payload field `type`"));
        assert!(serde_json::to_value(&message).is_err());
    }

    #[test]
    fn non_object_payloads_travel_under_data() {
        let message = Message::new(Amount(7));
        let json = message.to_json().expect("serializable");
        assert_eq!(json["data"], json!(7));
    }

    #[test]
    fn display_prints_the_json() {
        let message = Message::builder(Tick).message_id("m-2").build();
        let printed = message.to_string();
        assert!(printed.contains("\"messageId\":\"m-2\""));
        assert!(printed.contains("\"code\":\"test.envelope.tick\""));
    }
}
