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
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::*;

use crate::actor::ActorCell;
use crate::common::CONFIG;
use crate::environment::ActorResolver;

/// In-process resolver: addresses are `<name>://<id>` (or `<name>://<chosen>`).
pub struct LocalResolver {
    name: String,
    prefix: String,
    next_id: AtomicU64,
    actors: DashMap<String, Arc<dyn ActorCell>>,
}

impl LocalResolver {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            prefix: format!("{name}://"),
            name,
            next_id: AtomicU64::new(0),
            actors: DashMap::new(),
        }
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Default for LocalResolver {
    fn default() -> Self {
        Self::new(CONFIG.addressing.local_environment.clone())
    }
}

impl Debug for LocalResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalResolver")
            .field("name", &self.name)
            .field("actors", &self.actors.len())
            .finish()
    }
}

impl ActorResolver for LocalResolver {
    fn environment(&self) -> &str {
        &self.name
    }

    fn get_new_address(&self, address: Option<&str>) -> String {
        match address {
            None | Some("") => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{}{id}", self.prefix)
            }
            Some(address) if address.starts_with(&self.prefix) => address.to_string(),
            Some(address) => format!("{}{address}", self.prefix),
        }
    }

    fn register(&self, actor: Arc<dyn ActorCell>) {
        let address = actor.address().to_string();
        trace!(address, actor = actor.type_name(), "registering actor");
        if let Some(previous) = self.actors.insert(address.clone(), actor) {
            warn!(
                address,
                replaced = previous.type_name(),
                "address was already registered, replacing"
            );
        }
    }

    fn resolve(&self, address: &str) -> Option<Arc<dyn ActorCell>> {
        self.actors.get(address).map(|actor| actor.value().clone())
    }
}
