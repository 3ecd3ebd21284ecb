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

use async_trait::async_trait;
use mailroom_core::Message;

use crate::common::{AskError, AskResponse};

/// Carries messages to addresses.
#[async_trait]
pub trait MessageTransmitter: Send + Sync {
    /// Fire-and-forget delivery. Undeliverable messages are dropped.
    fn send(&self, address: &str, message: Message);

    /// Delivers `message` and waits for its handling outcome.
    async fn request(&self, address: &str, message: Message) -> Result<AskResponse, AskError>;
}
