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

use std::any::TypeId;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A static, wire-stable code for an error type.
///
/// Error filters match a carried error either by concrete type or by this code, so an
/// error that crossed a wire (and came back as a [`RemoteError`]) still matches.
pub trait ErrorCode {
    const CODE: &'static str;
}

type CodeMatcher = fn(&anyhow::Error) -> bool;

lazy_static! {
    static ref ERROR_CODES: RwLock<Vec<(TypeId, &'static str, CodeMatcher)>> =
        RwLock::new(Vec::new());
}

fn is_error<E>(error: &anyhow::Error) -> bool
where
    E: Display + Debug + Send + Sync + 'static,
{
    error.is::<E>()
}

/// Makes [`HandlerError::code`] report `E::CODE` for errors of type `E`.
///
/// Idempotent. Error filters built with `.error::<E>()` register their type here.
pub fn register_error_code<E>()
where
    E: ErrorCode + Display + Debug + Send + Sync + 'static,
{
    let type_id = TypeId::of::<E>();
    if ERROR_CODES.read().iter().any(|(id, ..)| *id == type_id) {
        return;
    }
    let mut codes = ERROR_CODES.write();
    if !codes.iter().any(|(id, ..)| *id == type_id) {
        codes.push((type_id, E::CODE, is_error::<E>));
    }
}

/// An error produced by a handler, shared by every copy of the [`ErrorMessage`] carrying it.
///
/// [`ErrorMessage`]: crate::ErrorMessage
#[derive(Clone)]
pub struct HandlerError(Arc<anyhow::Error>);

impl HandlerError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::new(error)))
    }

    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::msg(message)))
    }

    /// True when the underlying error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.0.is::<E>()
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// The error's registered code, or the code a [`RemoteError`] arrived with.
    pub fn code(&self) -> Option<&str> {
        if let Some(remote) = self.0.downcast_ref::<RemoteError>() {
            return remote.code.as_deref();
        }
        ERROR_CODES
            .read()
            .iter()
            .find(|(_, _, matches)| matches(self.inner()))
            .map(|(_, code, _)| *code)
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl Debug for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.chain().nth(1)
    }
}

#[derive(Serialize, Deserialize)]
struct WireError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    message: String,
}

impl Serialize for HandlerError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireError {
            code: self.code().map(String::from),
            message: self.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HandlerError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let WireError { code, message } = WireError::deserialize(deserializer)?;
        Ok(HandlerError::new(RemoteError { code, message }))
    }
}

/// An error rebuilt from its wire form: only its code and message survive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub code: Option<String>,
    pub message: String,
}
