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

use std::sync::Arc;

use crate::actor::ActorCell;

/// Maps addresses to actors within one environment.
pub trait ActorResolver: Send + Sync {
    /// Name of the environment this resolver serves.
    fn environment(&self) -> &str;

    /// Canonical form of `address`: a fresh address when `None`, the address qualified
    /// with this environment when unqualified, the address itself otherwise.
    fn get_new_address(&self, address: Option<&str>) -> String;

    /// Stores `actor` under its address.
    fn register(&self, actor: Arc<dyn ActorCell>);

    fn resolve(&self, address: &str) -> Option<Arc<dyn ActorCell>>;
}
