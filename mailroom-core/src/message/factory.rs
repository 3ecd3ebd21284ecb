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

use std::any::TypeId;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lazy_static::lazy_static;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::*;

use crate::message::envelope::DATA_KEY;
use crate::message::{
    ErrorMessage, Message, MessageBuilder, MessageDeserializeError, MessageKind,
    MessageRegistryError, Payload, ProcessingComplete, SuccessMessage, HEADER_KEYS,
};

/// The registered identity of a message type: its code and display name.
///
/// Serializes as the bare code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageType {
    pub code: &'static str,
    pub name: &'static str,
}

impl MessageType {
    pub fn of<T: MessageKind>() -> Self {
        Self {
            code: T::CODE,
            name: T::NAME,
        }
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for MessageType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        MessageFactory::message_type(&code)
            .ok_or_else(|| de::Error::custom(format!("unknown message code {code}")))
    }
}

type Decoder = fn(Value) -> serde_json::Result<Box<dyn Payload>>;

struct Registration {
    message_type: MessageType,
    type_id: TypeId,
    decode: Decoder,
}

impl Registration {
    fn of<T: MessageKind>() -> Self {
        Self {
            message_type: MessageType::of::<T>(),
            type_id: TypeId::of::<T>(),
            decode: decode::<T>,
        }
    }
}

fn decode<T: MessageKind>(fields: Value) -> serde_json::Result<Box<dyn Payload>> {
    serde_json::from_value::<T>(fields).map(|payload| Box::new(payload) as Box<dyn Payload>)
}

fn decode_payload(
    decode: Decoder,
    fields: Map<String, Value>,
) -> serde_json::Result<Box<dyn Payload>> {
    // unit payloads serialize to null and leave no fields behind
    if fields.is_empty() {
        return decode(Value::Null).or_else(|_| decode(Value::Object(fields)));
    }
    if fields.len() == 1 {
        if let Some(data) = fields.get(DATA_KEY) {
            if let Ok(payload) = decode(data.clone()) {
                return Ok(payload);
            }
        }
    }
    decode(Value::Object(fields))
}

lazy_static! {
    static ref KNOWN_MESSAGES: DashMap<&'static str, Registration> = {
        let known = DashMap::new();
        for registration in [
            Registration::of::<SuccessMessage>(),
            Registration::of::<ErrorMessage>(),
            Registration::of::<ProcessingComplete>(),
        ] {
            known.insert(registration.message_type.code, registration);
        }
        known
    };
}

/// The process-wide registry mapping message codes to their types.
///
/// Built-in messages are always registered. Everything else registers explicitly, or
/// implicitly when a handler table or subscription names the type.
pub struct MessageFactory;

impl MessageFactory {
    /// Registers `T` under `T::CODE`.
    ///
    /// Registering the same type again is a no-op. Registering a different type under a
    /// code that is already taken fails: codes are never reused.
    pub fn register<T: MessageKind>() -> Result<MessageType, MessageRegistryError> {
        match KNOWN_MESSAGES.entry(T::CODE) {
            Entry::Occupied(entry) => {
                let existing = entry.get();
                if existing.type_id == TypeId::of::<T>() {
                    Ok(existing.message_type)
                } else {
                    Err(MessageRegistryError::DuplicateCode {
                        code: T::CODE,
                        existing: existing.message_type.name,
                        attempted: T::NAME,
                    })
                }
            }
            Entry::Vacant(entry) => {
                trace!(code = T::CODE, name = T::NAME, "registering message type");
                let registration = Registration::of::<T>();
                let message_type = registration.message_type;
                entry.insert(registration);
                Ok(message_type)
            }
        }
    }

    /// The registered type for `code`, if any.
    pub fn message_type(code: &str) -> Option<MessageType> {
        KNOWN_MESSAGES
            .get(code)
            .map(|registration| registration.message_type)
    }

    /// Resolves a list of codes, dropping the ones nobody registered.
    pub fn message_types<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<MessageType> {
        codes
            .into_iter()
            .filter_map(|code| {
                let message_type = Self::message_type(code);
                if message_type.is_none() {
                    debug!(code, "dropping unknown message code");
                }
                message_type
            })
            .collect()
    }

    pub fn is_registered(code: &str) -> bool {
        KNOWN_MESSAGES.contains_key(code)
    }

    /// Rebuilds a message from its JSON wire shape, hydrating `reason` recursively.
    pub fn create(raw: Value) -> Result<Message, MessageDeserializeError> {
        let Value::Object(ref header) = raw else {
            return Err(MessageDeserializeError::new(&raw, "expected a JSON object"));
        };
        let Some(code) = header.get("code").and_then(Value::as_str) else {
            return Err(MessageDeserializeError::new(&raw, "missing code"));
        };
        let Some((message_type, decoder)) = KNOWN_MESSAGES
            .get(code)
            .map(|registration| (registration.message_type, registration.decode))
        else {
            return Err(MessageDeserializeError::new(
                &raw,
                format!("unknown code {code}"),
            ));
        };

        let reason = match header.get("reason") {
            None | Some(Value::Null) => None,
            Some(nested) => Some(Self::create(nested.clone())?),
        };

        let fields: Map<String, Value> = header
            .iter()
            .filter(|(key, _)| !HEADER_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let payload = decode_payload(decoder, fields).map_err(|error| {
            MessageDeserializeError::new(&raw, format!("{message_type}: {error}"))
        })?;

        let mut builder = MessageBuilder::from_payload(payload).maybe_reason(reason);
        if let Some(message_id) = header_str(header, "messageId", &raw)? {
            builder = builder.message_id(message_id);
        }
        if let Some(trace_id) = header_str(header, "traceId", &raw)? {
            builder = builder.trace_id(trace_id);
        }
        if let Some(reason_id) = header_str(header, "reasonId", &raw)? {
            builder = builder.reason_id(reason_id);
        }
        if let Some(created_at) = header_str(header, "createdAt", &raw)? {
            let created_at = DateTime::parse_from_rfc3339(created_at).map_err(|error| {
                MessageDeserializeError::new(&raw, format!("createdAt: {error}"))
            })?;
            builder = builder.created_at(created_at.with_timezone(&Utc));
        }
        Ok(builder.build())
    }
}

fn header_str<'a>(
    header: &'a Map<String, Value>,
    key: &str,
    raw: &Value,
) -> Result<Option<&'a str>, MessageDeserializeError> {
    match header.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(MessageDeserializeError::new(
            raw,
            format!("{key} must be a string"),
        )),
    }
}
