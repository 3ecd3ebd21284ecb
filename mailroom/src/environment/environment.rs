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
use std::sync::Arc;

use crate::common::CONFIG;
use crate::environment::{ActorResolver, LocalResolver, LocalTransmitter, MessageTransmitter};

/// A named resolver/transmitter pair owning the addresses prefixed with its name.
#[derive(Clone)]
pub struct Environment {
    name: Arc<str>,
    resolver: Arc<dyn ActorResolver>,
    transmitter: Arc<dyn MessageTransmitter>,
}

impl Environment {
    pub fn new(
        name: impl Into<Arc<str>>,
        resolver: Arc<dyn ActorResolver>,
        transmitter: Arc<dyn MessageTransmitter>,
    ) -> Self {
        Self {
            name: name.into(),
            resolver,
            transmitter,
        }
    }

    /// The in-process environment, named after `addressing.local_environment`.
    pub fn local() -> Self {
        Self::local_named(CONFIG.addressing.local_environment.as_str())
    }

    /// An in-process environment with a custom name.
    pub fn local_named(name: &str) -> Self {
        let resolver: Arc<dyn ActorResolver> = Arc::new(LocalResolver::new(name));
        let transmitter = Arc::new(LocalTransmitter::new(resolver.clone()));
        Self::new(name, resolver, transmitter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver(&self) -> &Arc<dyn ActorResolver> {
        &self.resolver
    }

    pub fn transmitter(&self) -> &Arc<dyn MessageTransmitter> {
        &self.transmitter
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
