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
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use mailroom_core::{Message, MessageType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::*;

use crate::common::{ActorSystem, AskError, AskResponse};
use crate::environment::MessageTransmitter;
use crate::message::Subscribe;

/// An addressable handle to an actor.
///
/// Refs are cheap to clone and compare equal (and hash) by address, so two refs built
/// independently for the same actor are interchangeable. A ref serializes as its
/// address and deserializes through the global [`ActorSystem`].
#[derive(Clone)]
pub struct ActorRef {
    address: Arc<str>,
    transmitter: Arc<dyn MessageTransmitter>,
}

impl ActorRef {
    pub fn new(address: impl Into<Arc<str>>, transmitter: Arc<dyn MessageTransmitter>) -> Self {
        Self {
            address: address.into(),
            transmitter,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sends a message without waiting for it to be handled.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(level = "trace", skip(self, message), fields(address = %self.address))]
    pub fn tell(&self, message: impl Into<Message>) {
        self.transmitter.send(&self.address, message.into());
    }

    /// Sends a message and waits for the actor's `SuccessMessage` or `ErrorMessage`.
    pub async fn ask(&self, message: impl Into<Message>) -> Result<AskResponse, AskError> {
        let message = message.into();
        trace!(address = %self.address, code = message.code(), "ask");
        self.transmitter.request(&self.address, message).await
    }

    /// Asks this actor to forward its outcome messages to `listener`: all of them when
    /// `message_types` is `None`, otherwise those with a listed code.
    pub fn subscribe(&self, listener: &ActorRef, message_types: Option<Vec<MessageType>>) {
        self.tell(Subscribe::new(listener.clone(), message_types));
    }
}

impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl Debug for ActorRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActorRef").field(&self.address).finish()
    }
}

impl Display for ActorRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl Serialize for ActorRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.address)
    }
}

impl<'de> Deserialize<'de> for ActorRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let address = String::deserialize(deserializer)?;
        Ok(ActorSystem::global().get_ref(&address))
    }
}
