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

use std::sync::Arc;

use async_trait::async_trait;
use mailroom_core::Message;
use tracing::*;

use crate::common::{AskError, AskResponse, MissingActorError};
use crate::environment::{ActorResolver, MessageTransmitter};

/// Delivers messages by resolving the address and calling the actor directly.
pub struct LocalTransmitter {
    resolver: Arc<dyn ActorResolver>,
}

impl LocalTransmitter {
    pub fn new(resolver: Arc<dyn ActorResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl MessageTransmitter for LocalTransmitter {
    fn send(&self, address: &str, message: Message) {
        match self.resolver.resolve(address) {
            Some(actor) => actor.tell(message),
            None => trace!(
                address,
                code = message.code(),
                "no actor at address, dropping message"
            ),
        }
    }

    async fn request(&self, address: &str, message: Message) -> Result<AskResponse, AskError> {
        let actor = self
            .resolver
            .resolve(address)
            .ok_or_else(|| MissingActorError::new(address))?;
        actor.ask(message).await
    }
}
