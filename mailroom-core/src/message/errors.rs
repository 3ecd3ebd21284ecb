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

use thiserror::Error;

/// Raised when a JSON value cannot be turned back into a registered message.
///
/// Covers a missing or unknown `code`, a malformed header, an undecodable payload and
/// any of those inside a nested `reason`.
#[derive(Debug, Clone, Error)]
#[error("[Messages]: can't create message from input: {input}")]
pub struct MessageDeserializeError {
    /// The rejected input, as JSON text.
    pub input: String,
    /// What was wrong with it.
    pub detail: String,
}

impl MessageDeserializeError {
    pub(crate) fn new(input: &serde_json::Value, detail: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            detail: detail.into(),
        }
    }
}

/// Raised by [`MessageFactory::register`](crate::MessageFactory::register).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageRegistryError {
    /// A different type already owns the code.
    #[error("message code {code} is already registered to {existing}, cannot register {attempted}")]
    DuplicateCode {
        code: &'static str,
        existing: &'static str,
        attempted: &'static str,
    },
}
