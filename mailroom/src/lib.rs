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

//! # Mailroom
//!
//! An in-process actor runtime built on Tokio. Actors own their state, receive
//! messages through a FIFO mailbox and talk to each other only through addressable
//! [`ActorRef`](prelude::ActorRef)s.
//!
//! ## Key Concepts
//!
//! - **Actors (`ManagedActor`)**: Wrap a user model implementing [`Actor`](prelude::Actor)
//!   with an address, a mailbox and listener sets.
//! - **Messaging**: `tell` is fire-and-forget; `ask` waits for the actor's
//!   `SuccessMessage` or `ErrorMessage`, bounded by a timeout.
//! - **Dispatch**: Handlers are declared per actor type on a `HandlerTable`, keyed by
//!   message code and optionally refined by reason and error filters.
//! - **Listeners**: Every handled message produces an outcome message that is emitted to
//!   subscribed listeners (`Subscribe`).
//! - **Addressing**: Addresses look like `<environment>:<local part>`; each
//!   `Environment` pairs a resolver with a transmitter, and the local one
//!   (`local://<id>`) is the fallback.
//! - **System (`ActorSystem`)**: Creates actors and hands out refs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailroom::prelude::*;
//!
//! #[mailroom_message(code = "01HBN0K9K9A2HEB918MY0JA85Q")]
//! struct Ping;
//!
//! struct Pinger;
//!
//! impl Actor for Pinger {
//!     fn handlers(table: &mut HandlerTable<ManagedActor<Self>>) {
//!         table.receive::<Ping>("ping").handle(|_actor, _delivery| async move { Ok(()) });
//!     }
//! }
//!
//! let pinger = ActorSystem::global().create(Pinger);
//! let response = pinger.ask(Ping).await?;
//! assert!(is_success_message(&response.response));
//! ```

/// Actors and their runtime wrapper.
pub(crate) mod actor;

/// Refs, the system facade, configuration and errors.
pub(crate) mod common;

/// Address resolution and message transport.
pub(crate) mod environment;

/// Messages understood by every actor.
pub(crate) mod message;

/// Handler closures resolve to [`anyhow::Result`].
pub use anyhow;

/// Commonly used items, for glob import.
pub mod prelude {
    pub use mailroom_core::prelude::*;

    pub use crate::actor::{Actor, ActorCell, ManagedActor};
    pub use crate::common::{
        ActorRef, ActorSystem, ActorSystemSettings, AddressingConfig, AskError,
        AskNoHandlerError, AskResponse, AskTimeoutError, CreateArgs, HandlerPanic,
        MailroomConfig, MissingActorError, TimeoutConfig, CONFIG,
    };
    pub use crate::environment::{
        ActorResolver, Environment, EnvironmentManager, LocalResolver, LocalTransmitter,
        MessageTransmitter,
    };
    pub use crate::message::{is_subscribe_message, Subscribe};
}
