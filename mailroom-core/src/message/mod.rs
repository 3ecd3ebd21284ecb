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

//! Message header, payloads and the code registry.
//!
//! # Key Components
//!
//! *   [`Message`]: The immutable, reference-counted value every actor exchanges.
//! *   [`MessageKind`]: Implemented (usually through `#[mailroom_message]`) by each
//!     concrete payload type; supplies its routing code and display name.
//! *   [`MessageFactory`]: Rebuilds typed messages from their JSON wire shape.
//! *   [`SuccessMessage`], [`ErrorMessage`], [`ProcessingComplete`]: Built-in messages
//!     emitted by the runtime.
//! *   [`HandlerError`]: A cloneable error carried by an [`ErrorMessage`].

pub use builtin::{
    is_error_message, is_processing_complete, is_success_message, ErrorMessage,
    ProcessingComplete, SuccessMessage,
};
pub use envelope::{Message, MessageBuilder};
pub use errors::{MessageDeserializeError, MessageRegistryError};
pub use factory::{MessageFactory, MessageType};
pub use handler_error::{register_error_code, ErrorCode, HandlerError, RemoteError};
pub use kind::{MessageKind, Payload};

pub(crate) use envelope::HEADER_KEYS;

mod builtin;
mod envelope;
mod errors;
mod factory;
mod handler_error;
mod kind;
