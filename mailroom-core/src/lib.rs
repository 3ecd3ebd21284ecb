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

#![forbid(unsafe_code)]

//! # Mailroom Core
//!
//! The message model and dispatch machinery underneath the Mailroom actor runtime.
//!
//! ## Key Concepts
//!
//! - **Messages (`Message`)**: Immutable, cheaply cloneable values carrying a header
//!   (id, code, trace id, timestamp, causing "reason") and a typed payload.
//! - **Codes**: Every message type has a stable code (`MessageKind::CODE`) used for
//!   routing and as its wire identity.
//! - **Factory (`MessageFactory`)**: A process-wide code registry that rebuilds typed
//!   messages, including their reason chains, from JSON.
//! - **Handler registry (`MessageHandlers`)**: Handlers registered once per owning type,
//!   looked up by message code in registration order.
//! - **Binding (`HandlerTable`)**: Declarative handler registration with optional reason
//!   and error filters; a matching handler receives a `Delivery`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailroom_core::prelude::*;
//!
//! #[mailroom_message(code = "01HBN0K9K9A2HEB918MY0JA85Q")]
//! struct Ping;
//!
//! let ping = Message::new(Ping);
//! assert!(ping.is::<Ping>());
//! ```

extern crate self as mailroom_core;

/// Handler registration, lookup and dispatch binding.
pub mod handling;

/// Message header, payloads, factory and built-in message types.
pub mod message;

pub use handling::{
    Delivery, ErasedHandler, ErrorFilter, HandlerBuilder, HandlerDescriptor, HandlerEvents,
    HandlerFuture, HandlerInfo, HandlerReturn, HandlerTable, HandlingObserver, MessageHandlers,
    ObserverId, ReasonFilter,
};
pub use message::{
    is_error_message, is_processing_complete, is_success_message, register_error_code,
    ErrorCode, ErrorMessage, HandlerError, Message, MessageBuilder, MessageDeserializeError,
    MessageFactory, MessageKind, MessageRegistryError, MessageType, Payload, ProcessingComplete,
    RemoteError, SuccessMessage,
};

/// Commonly used items, for glob import.
pub mod prelude {
    pub use mailroom_macro::mailroom_message;

    pub use crate::handling::{
        Delivery, HandlerEvents, HandlerInfo, HandlerTable, HandlingObserver, MessageHandlers,
    };
    pub use crate::message::{
        is_error_message, is_processing_complete, is_success_message, register_error_code,
        ErrorCode, ErrorMessage, HandlerError, Message, MessageFactory, MessageKind, MessageType,
        ProcessingComplete, RemoteError, SuccessMessage,
    };
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
