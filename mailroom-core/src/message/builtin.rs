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

use mailroom_macro::mailroom_message;

use crate::message::{HandlerError, Message};

/// Emitted by an actor once every handler for a message has completed.
///
/// Its reason is the handled message.
#[mailroom_message(code = "01H83DTGF2JXXGJ96B4P1B9FNZ")]
pub struct SuccessMessage;

/// Emitted by an actor when a handler failed. Its reason is the handled message.
#[mailroom_message(code = "01H7J0E0RK84PTTBB5SV4ABWWV")]
pub struct ErrorMessage {
    pub error: HandlerError,
}

/// Signals that a unit of work is done. Actors emit it when they see fit.
#[mailroom_message(code = "01H81549TN9GVH5NGBAPFK8TVZ")]
pub struct ProcessingComplete;

impl Message {
    /// A [`SuccessMessage`] caused by `reason`.
    pub fn success(reason: &Message) -> Message {
        Message::builder(SuccessMessage).reason(reason).build()
    }

    /// An [`ErrorMessage`] carrying `error`, caused by `reason`.
    pub fn failure(reason: &Message, error: impl Into<HandlerError>) -> Message {
        Message::builder(ErrorMessage {
            error: error.into(),
        })
        .reason(reason)
        .build()
    }
}

pub fn is_success_message(message: &Message) -> bool {
    message.is::<SuccessMessage>()
}

pub fn is_error_message(message: &Message) -> bool {
    message.is::<ErrorMessage>()
}

pub fn is_processing_complete(message: &Message) -> bool {
    message.is::<ProcessingComplete>()
}
