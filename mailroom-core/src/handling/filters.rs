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

use std::fmt::{self, Debug, Formatter};

use crate::message::{HandlerError, MessageType};

/// Accepts a message only when its reason has the given code.
///
/// `bind` controls whether the matched reason is handed to the handler in
/// [`Delivery::reason`](crate::Delivery::reason).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReasonFilter {
    pub method: &'static str,
    pub reason: MessageType,
    pub bind: bool,
}

/// Accepts an error message only when its error matches by type or by code.
#[derive(Clone)]
pub struct ErrorFilter {
    pub method: &'static str,
    pub error_name: &'static str,
    pub code: Option<&'static str>,
    pub bind: bool,
    matches_type: fn(&anyhow::Error) -> bool,
}

impl ErrorFilter {
    pub fn new(
        method: &'static str,
        error_name: &'static str,
        code: Option<&'static str>,
        bind: bool,
        matches_type: fn(&anyhow::Error) -> bool,
    ) -> Self {
        Self {
            method,
            error_name,
            code,
            bind,
            matches_type,
        }
    }

    pub fn matches(&self, error: &HandlerError) -> bool {
        if (self.matches_type)(error.inner()) {
            return true;
        }
        match self.code {
            Some(code) => error.code() == Some(code),
            None => false,
        }
    }
}

impl Debug for ErrorFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorFilter")
            .field("method", &self.method)
            .field("error_name", &self.error_name)
            .field("code", &self.code)
            .field("bind", &self.bind)
            .finish()
    }
}
