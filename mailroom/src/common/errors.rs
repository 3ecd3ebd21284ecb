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

use std::time::Duration;

use mailroom_core::{ErrorCode, Message};
use thiserror::Error;

/// `ask` was called for a message the actor has no handler for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Don't know how to handle {message_type} ({message_code})")]
pub struct AskNoHandlerError {
    pub message_type: &'static str,
    pub message_code: &'static str,
}

impl AskNoHandlerError {
    pub fn new(message: &Message) -> Self {
        Self {
            message_type: message.name(),
            message_code: message.code(),
        }
    }
}

impl ErrorCode for AskNoHandlerError {
    const CODE: &'static str = "ASK_NO_HANDLER_ERROR";
}

/// `ask` gave up waiting. The handling itself keeps running.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message_type} ({message_code}) was not handled in {timeout:?}")]
pub struct AskTimeoutError {
    pub message_type: &'static str,
    pub message_code: &'static str,
    pub timeout: Duration,
}

impl AskTimeoutError {
    pub fn new(message: &Message, timeout: Duration) -> Self {
        Self {
            message_type: message.name(),
            message_code: message.code(),
            timeout,
        }
    }
}

impl ErrorCode for AskTimeoutError {
    const CODE: &'static str = "ASK_TIMEOUT_ERROR";
}

/// Nothing is registered at the requested address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Actor is missing: {address}")]
pub struct MissingActorError {
    pub address: String,
}

impl MissingActorError {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl ErrorCode for MissingActorError {
    const CODE: &'static str = "MISSING_ACTOR";
}

/// A handler panicked; reported to listeners like any other handler error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{owner}::{method} panicked: {panic}")]
pub struct HandlerPanic {
    pub owner: &'static str,
    pub method: &'static str,
    pub panic: String,
}

impl ErrorCode for HandlerPanic {
    const CODE: &'static str = "HANDLER_PANIC";
}

/// Why an `ask` produced no response.
///
/// A handler error is *not* an `AskError`: it resolves the ask with an
/// `ErrorMessage` response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AskError {
    #[error(transparent)]
    NoHandler(#[from] AskNoHandlerError),
    #[error(transparent)]
    Timeout(#[from] AskTimeoutError),
    #[error(transparent)]
    MissingActor(#[from] MissingActorError),
    /// The handling task was cancelled or torn down by the runtime.
    #[error("handling was interrupted: {0}")]
    Interrupted(String),
}

impl AskError {
    /// The static code of the underlying error, when it has one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AskError::NoHandler(_) => Some(AskNoHandlerError::CODE),
            AskError::Timeout(_) => Some(AskTimeoutError::CODE),
            AskError::MissingActor(_) => Some(MissingActorError::CODE),
            AskError::Interrupted(_) => None,
        }
    }
}

pub(crate) fn register_error_codes() {
    mailroom_core::register_error_code::<AskNoHandlerError>();
    mailroom_core::register_error_code::<AskTimeoutError>();
    mailroom_core::register_error_code::<MissingActorError>();
    mailroom_core::register_error_code::<HandlerPanic>();
}
