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

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use mailroom_core::Message;

use crate::common::{AskError, AskResponse};

/// A registered actor as seen by resolvers and transmitters, whatever its model type.
#[async_trait]
pub trait ActorCell: Send + Sync + 'static {
    fn address(&self) -> &str;

    /// Name of the model type.
    fn type_name(&self) -> &'static str;

    fn tell(&self, message: Message);

    async fn ask(&self, message: Message) -> Result<AskResponse, AskError>;

    fn mailbox_len(&self) -> usize;

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}
