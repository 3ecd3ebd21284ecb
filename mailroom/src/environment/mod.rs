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

//! Address resolution and message transport.
//!
//! An [`Environment`] owns a slice of the address space (every address starting with
//! `<name>:`) and pairs an [`ActorResolver`], which maps addresses to actors, with a
//! [`MessageTransmitter`], which carries messages to them. The [`EnvironmentManager`]
//! picks the environment for an address, falling back to the local one.

pub use environment::Environment;
pub use local_resolver::LocalResolver;
pub use local_transmitter::LocalTransmitter;
pub use manager::EnvironmentManager;
pub use resolver::ActorResolver;
pub use transmitter::MessageTransmitter;

mod environment;
mod local_resolver;
mod local_transmitter;
mod manager;
mod resolver;
mod transmitter;
