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

//! Refs, the system facade, configuration and errors.

pub use actor_ref::ActorRef;
pub use ask_response::AskResponse;
pub use config::{AddressingConfig, MailroomConfig, TimeoutConfig, CONFIG};
pub use errors::{
    AskError, AskNoHandlerError, AskTimeoutError, HandlerPanic, MissingActorError,
};
pub use system::{ActorSystem, ActorSystemSettings, CreateArgs};

mod actor_ref;
mod ask_response;
mod config;
pub(crate) mod errors;
mod system;
