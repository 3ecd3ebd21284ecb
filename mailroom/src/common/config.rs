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

use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for the Mailroom runtime.
///
/// Loaded from TOML in XDG-compliant directories; every field has a default, so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailroomConfig {
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Addressing configuration
    pub addressing: AddressingConfig,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long `ask` waits for a message to be handled, in milliseconds
    pub ask_timeout_ms: u64,
}

/// Addressing configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressingConfig {
    /// Name of the default, in-process environment (`<name>://<id>` addresses)
    pub local_environment: String,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            ask_timeout_ms: 100_000,
        }
    }
}

impl Default for AddressingConfig {
    fn default() -> Self {
        Self {
            local_environment: "local".to_string(),
        }
    }
}

impl MailroomConfig {
    /// Default ask timeout as a `Duration`
    pub const fn ask_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.ask_timeout_ms)
    }

    /// Parses a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load configuration from `$XDG_CONFIG_HOME/mailroom/config.toml`.
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("mailroom") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(source) => match Self::from_toml(&source) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: MailroomConfig = MailroomConfig::load();
}
