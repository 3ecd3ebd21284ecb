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

use mailroom_core::{Message, MessageFactory, MessageKind, MessageType};
use mailroom_macro::mailroom_message;
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::ActorRef;

/// Registers `listener` for the outcome messages an actor emits.
///
/// With `message_types` the listener only receives messages with one of those codes;
/// without, it receives everything. On the wire the types are a list of codes, and
/// codes nobody registered are dropped when the message is rebuilt.
#[mailroom_message(code = "01H72V9YJNPNJ0G7PYAR4RFKJB")]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscribe {
    pub listener: ActorRef,
    #[serde(default, deserialize_with = "known_message_types")]
    pub message_types: Option<Vec<MessageType>>,
}

impl Subscribe {
    pub fn new(listener: ActorRef, message_types: Option<Vec<MessageType>>) -> Self {
        Self {
            listener,
            message_types,
        }
    }

    /// Subscribes to every outcome.
    pub fn all(listener: ActorRef) -> Self {
        Self::new(listener, None)
    }

    /// Subscribes to the listed message types only.
    pub fn only(listener: ActorRef, message_types: Vec<MessageType>) -> Self {
        Self::new(listener, Some(message_types))
    }
}

fn known_message_types<'de, D>(deserializer: D) -> Result<Option<Vec<MessageType>>, D::Error>
where
    D: Deserializer<'de>,
{
    let codes = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(codes.map(|codes| MessageFactory::message_types(codes.iter().map(String::as_str))))
}

pub fn is_subscribe_message(message: &Message) -> bool {
    message.code() == Subscribe::CODE
}
