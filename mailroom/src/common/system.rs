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

use std::any::type_name;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tokio_util::task::TaskTracker;
use tracing::*;

use crate::actor::{Actor, ManagedActor};
use crate::common::errors::register_error_codes;
use crate::common::{ActorRef, CONFIG};
use crate::environment::{Environment, EnvironmentManager};

/// Settings shared by every actor an [`ActorSystem`] creates.
#[derive(Clone, Debug)]
pub struct ActorSystemSettings {
    /// Ask timeout for actors created without an explicit one.
    pub ask_timeout: Duration,
    pub manager: Arc<EnvironmentManager>,
}

impl Default for ActorSystemSettings {
    fn default() -> Self {
        Self {
            ask_timeout: CONFIG.ask_timeout(),
            manager: Arc::new(EnvironmentManager::default()),
        }
    }
}

/// Per-actor options for [`ActorSystem::create_with`].
#[derive(Clone, Debug, Default)]
pub struct CreateArgs {
    /// Requested address; qualified with the target environment when needed.
    pub address: Option<String>,
    /// Overrides the system's ask timeout for this actor.
    pub ask_timeout: Option<Duration>,
}

impl CreateArgs {
    pub fn at(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ask_timeout: None,
        }
    }

    pub fn with_ask_timeout(mut self, ask_timeout: Duration) -> Self {
        self.ask_timeout = Some(ask_timeout);
        self
    }
}

lazy_static! {
    static ref GLOBAL: ActorSystem = ActorSystem::new(ActorSystemSettings::default());
}

/// Creates actors and hands out refs to them.
///
/// [`ActorSystem::global`] is the process-wide instance used when refs are
/// deserialized; independent instances keep their own environments and task tracking.
pub struct ActorSystem {
    settings: RwLock<ActorSystemSettings>,
    tracker: TaskTracker,
}

impl Debug for ActorSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("settings", &*self.settings.read())
            .field("in_flight", &self.tracker.len())
            .finish()
    }
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new(ActorSystemSettings::default())
    }
}

impl ActorSystem {
    pub fn global() -> &'static ActorSystem {
        &GLOBAL
    }

    pub fn new(settings: ActorSystemSettings) -> Self {
        register_error_codes();
        Self {
            settings: RwLock::new(settings),
            tracker: TaskTracker::new(),
        }
    }

    /// A snapshot of the current settings.
    pub fn settings(&self) -> ActorSystemSettings {
        self.settings.read().clone()
    }

    /// Changes settings for actors created from now on.
    pub fn set(&self, update: impl FnOnce(&mut ActorSystemSettings)) {
        update(&mut *self.settings.write());
    }

    pub fn register_environment(&self, environment: Environment) {
        self.settings.read().manager.register(environment);
    }

    /// Creates an actor at a fresh local address.
    pub fn create<A: Actor>(&self, model: A) -> ActorRef {
        self.create_with(model, CreateArgs::default())
    }

    /// Creates an actor, registers it with the environment owning its address, calls
    /// [`Actor::start`] and returns its ref.
    ///
    /// An actor already registered at a requested address is replaced: later messages
    /// reach the new actor and the replacement is logged as a warning. Check
    /// [`resolve`](Self::resolve) first when the address must be vacant.
    #[instrument(skip(self, model), fields(actor = type_name::<A>()))]
    pub fn create_with<A: Actor>(&self, model: A, args: CreateArgs) -> ActorRef {
        ManagedActor::<A>::ensure_handlers();

        let settings = self.settings();
        let requested = args.address.as_deref();
        let environment = settings.manager.get_environment_by_address(requested);
        let address = environment.resolver().get_new_address(requested);

        let actor = ManagedActor::new(
            address.clone(),
            args.ask_timeout.unwrap_or(settings.ask_timeout),
            self.tracker.clone(),
            model,
        );
        environment.resolver().register(actor.clone());

        let me = ActorRef::new(address, environment.transmitter().clone());
        actor.model.start(&me);
        debug!(address = me.address(), environment = environment.name(), "actor created");
        me
    }

    /// A ref to the actor at `address`, if one is registered there.
    ///
    /// `None` means [`create_with`](Self::create_with) can take the address without
    /// replacing anyone.
    pub fn resolve(&self, address: &str) -> Option<ActorRef> {
        let environment = self.settings.read().manager.get_environment_by_address(Some(address));
        let address = environment.resolver().get_new_address(Some(address));
        match environment.resolver().resolve(&address) {
            Some(_) => Some(ActorRef::new(address, environment.transmitter().clone())),
            None => {
                trace!(address, "nothing registered at address");
                None
            }
        }
    }

    /// A ref to `address`, whether or not anything is registered there yet.
    pub fn get_ref(&self, address: &str) -> ActorRef {
        let environment = self.settings.read().manager.get_environment_by_address(Some(address));
        let address = environment.resolver().get_new_address(Some(address));
        ActorRef::new(address, environment.transmitter().clone())
    }

    /// The actor registered at `address`, if it is an `A`.
    pub fn lookup<A: Actor>(&self, address: &str) -> Option<Arc<ManagedActor<A>>> {
        let environment = self.settings.read().manager.get_environment_by_address(Some(address));
        let address = environment.resolver().get_new_address(Some(address));
        environment
            .resolver()
            .resolve(&address)?
            .as_any()
            .downcast::<ManagedActor<A>>()
            .ok()
    }

    /// Number of handling tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every handling task spawned by this system has finished, including
    /// tasks spawned while waiting.
    ///
    /// Do not call it while a handler is expected to never finish.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
