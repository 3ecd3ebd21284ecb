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

//! Actors and their runtime wrapper.

use mailroom_core::HandlerTable;

pub use actor_cell::ActorCell;
pub use managed_actor::ManagedActor;

use crate::common::ActorRef;

mod actor_cell;
mod managed_actor;

/// User state and behavior of an actor.
///
/// The model is owned by a [`ManagedActor`] and shared between concurrently running
/// handlers, so mutable state belongs behind interior mutability.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Counter {
///     total: AtomicU64,
/// }
///
/// impl Actor for Counter {
///     fn handlers(table: &mut HandlerTable<ManagedActor<Self>>) {
///         table
///             .receive::<Increment>("increment")
///             .handle(|actor, delivery| async move {
///                 let by = delivery.payload::<Increment>().map_or(0, |inc| inc.by);
///                 actor.model.total.fetch_add(by, Ordering::SeqCst);
///                 Ok(())
///             });
///     }
/// }
/// ```
pub trait Actor: Send + Sync + Sized + 'static {
    /// Declares the handlers of this actor type. Called once per type, on first creation.
    fn handlers(_table: &mut HandlerTable<ManagedActor<Self>>) {}

    /// Called once, right after the actor was registered at its address.
    fn start(&self, _me: &ActorRef) {}
}
