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

use mailroom_core::{is_error_message, HandlerError, Message};

/// The outcome of a successful `ask`: the actor's `SuccessMessage` or `ErrorMessage`.
#[derive(Clone, Debug)]
pub struct AskResponse {
    /// The emitted `SuccessMessage` or `ErrorMessage`.
    pub response: Message,
    /// The asked message.
    pub reason: Option<Message>,
    /// The handler error, when handling failed.
    pub error: Option<HandlerError>,
}

impl AskResponse {
    pub fn is_success(&self) -> bool {
        !is_error_message(&self.response)
    }

    /// Turns a failed handling into an `Err`.
    pub fn into_result(self) -> Result<Message, HandlerError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.response),
        }
    }
}

impl From<Message> for AskResponse {
    fn from(response: Message) -> Self {
        Self {
            reason: response.reason().cloned(),
            error: response.error().cloned(),
            response,
        }
    }
}
