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

use std::any::Any;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A concrete message payload type.
///
/// `CODE` identifies the type for routing and on the wire and must never be reused by a
/// different type. `NAME` is the human readable type name. Implement it through
/// `#[mailroom_message]` rather than by hand.
pub trait MessageKind:
    Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
    /// Stable routing code.
    const CODE: &'static str;
    /// Display name.
    const NAME: &'static str;
}

/// The object-safe view of a payload stored inside a [`Message`](crate::Message).
pub trait Payload: Any + Debug + Send + Sync {
    /// Routing code of the concrete type.
    fn code(&self) -> &'static str;
    /// Display name of the concrete type.
    fn name(&self) -> &'static str;
    /// Allows downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// Serializes the payload fields.
    fn to_value(&self) -> serde_json::Result<Value>;
}

impl<T: MessageKind> Payload for T {
    fn code(&self) -> &'static str {
        T::CODE
    }

    fn name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
