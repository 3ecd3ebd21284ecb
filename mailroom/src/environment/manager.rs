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

use parking_lot::RwLock;
use tracing::*;

use crate::environment::Environment;

/// Selects the environment for an address by the prefix before its first `:`.
#[derive(Debug)]
pub struct EnvironmentManager {
    local: Environment,
    environments: RwLock<Vec<Environment>>,
}

impl Default for EnvironmentManager {
    fn default() -> Self {
        Self::new(Environment::local())
    }
}

impl EnvironmentManager {
    /// A manager whose fallback is `local`.
    pub fn new(local: Environment) -> Self {
        Self::with_environments(local, Vec::new())
    }

    pub fn with_environments(local: Environment, environments: Vec<Environment>) -> Self {
        Self {
            local,
            environments: RwLock::new(environments),
        }
    }

    pub fn local(&self) -> &Environment {
        &self.local
    }

    /// Adds `environment`, replacing any registered under the same name.
    pub fn register(&self, environment: Environment) {
        debug!(name = environment.name(), "registering environment");
        let mut environments = self.environments.write();
        environments.retain(|existing| existing.name() != environment.name());
        environments.push(environment);
    }

    /// Exact lookup by name.
    pub fn get_environment_by_name(&self, name: &str) -> Option<Environment> {
        if self.local.name() == name {
            return Some(self.local.clone());
        }
        self.environments
            .read()
            .iter()
            .find(|environment| environment.name() == name)
            .cloned()
    }

    /// The environment owning `address`, or the local one for absent, unqualified or
    /// unknown addresses.
    pub fn get_environment_by_address(&self, address: Option<&str>) -> Environment {
        address
            .and_then(|address| address.split_once(':'))
            .and_then(|(name, _)| self.get_environment_by_name(name))
            .unwrap_or_else(|| self.local.clone())
    }
}
