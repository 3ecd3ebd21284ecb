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

use std::any::{type_name, Any, TypeId};
use std::collections::{HashSet, VecDeque};
use std::fmt::{self, Debug, Formatter};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::FutureExt;
use lazy_static::lazy_static;
use mailroom_core::{HandlerDescriptor, HandlerError, HandlerTable, Message, MessageHandlers};
use parking_lot::{Mutex, RwLock};
use tokio_util::task::TaskTracker;
use tracing::*;

use crate::actor::{Actor, ActorCell};
use crate::common::{
    ActorRef, AskError, AskNoHandlerError, AskResponse, AskTimeoutError, HandlerPanic,
};
use crate::message::Subscribe;

lazy_static! {
    static ref REGISTERED_TYPES: Mutex<HashSet<TypeId>> = Mutex::new(HashSet::new());
}

/// A running actor: address, mailbox, listeners and the user model.
///
/// Every dequeued message is handled on its own task, spawned in mailbox order. Handlers
/// registered for the message's code run one after another within that task; the first
/// failure (an `Err` or a panic) stops the rest and is reported as an `ErrorMessage`,
/// otherwise a `SuccessMessage` is reported. Either way the outcome is emitted to
/// listeners.
pub struct ManagedActor<A: Actor> {
    address: Arc<str>,
    ask_timeout: Duration,
    inbox: Mutex<VecDeque<Message>>,
    listeners: DashMap<&'static str, HashSet<ActorRef>>,
    everything_listeners: RwLock<HashSet<ActorRef>>,
    tracker: TaskTracker,
    me: Weak<Self>,
    /// The user-defined model.
    pub model: A,
}

impl<A: Actor> ManagedActor<A> {
    /// Registers the handlers of `A`, once per type.
    pub(crate) fn ensure_handlers() {
        let mut registered = REGISTERED_TYPES.lock();
        if !registered.insert(TypeId::of::<A>()) {
            return;
        }

        let mut table = HandlerTable::<Self>::named(type_name::<A>());
        A::handlers(&mut table);
        table
            .receive::<Subscribe>("subscribe")
            .handle(|actor: Arc<Self>, delivery| async move {
                if let Some(subscribe) = delivery.payload::<Subscribe>() {
                    actor.subscribe(subscribe);
                }
                Ok(())
            });
        debug!(
            actor = type_name::<A>(),
            handlers = table.registered().len(),
            "registered actor handlers"
        );
    }

    pub(crate) fn new(
        address: String,
        ask_timeout: Duration,
        tracker: TaskTracker,
        model: A,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            address: address.into(),
            ask_timeout,
            inbox: Mutex::new(VecDeque::new()),
            listeners: DashMap::new(),
            everything_listeners: RwLock::new(HashSet::new()),
            tracker,
            me: me.clone(),
            model,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn ask_timeout(&self) -> Duration {
        self.ask_timeout
    }

    /// Messages queued and not yet picked up.
    pub fn mailbox_len(&self) -> usize {
        self.inbox.lock().len()
    }

    /// Listeners subscribed to every outcome.
    pub fn listeners(&self) -> Vec<ActorRef> {
        self.everything_listeners.read().iter().cloned().collect()
    }

    /// Listeners subscribed to `code`.
    pub fn listeners_for(&self, code: &str) -> Vec<ActorRef> {
        self.listeners
            .get(code)
            .map(|listeners| listeners.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Queues `message` and drains the mailbox, spawning one handling task per message
    /// in FIFO order.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn tell(&self, message: impl Into<Message>) {
        let message = message.into();
        trace!(actor = %self.address, code = message.code(), "message queued");
        let mut inbox = self.inbox.lock();
        inbox.push_back(message);
        let Some(me) = self.me.upgrade() else {
            return;
        };
        while let Some(next) = inbox.pop_front() {
            self.tracker.spawn(me.clone().handle_message(next));
        }
    }

    /// Handles `message` on a separate task and waits up to the ask timeout for the
    /// outcome.
    ///
    /// Fails immediately when no handler is registered for the message's code. On
    /// timeout the handling keeps running and its outcome is still emitted to listeners.
    pub async fn ask(&self, message: impl Into<Message>) -> Result<AskResponse, AskError> {
        let message = message.into();
        if !MessageHandlers::has_handlers::<Self>(message.code()) {
            debug!(actor = %self.address, code = message.code(), "ask without a handler");
            return Err(AskNoHandlerError::new(&message).into());
        }
        let Some(me) = self.me.upgrade() else {
            return Err(AskError::Interrupted(format!(
                "{} is shutting down",
                self.address
            )));
        };

        let handling = self.tracker.spawn(me.handle_message(message.clone()));
        match tokio::time::timeout(self.ask_timeout, handling).await {
            Ok(Ok(response)) => Ok(AskResponse::from(response)),
            Ok(Err(join_error)) => Err(AskError::Interrupted(join_error.to_string())),
            Err(_) => {
                warn!(
                    actor = %self.address,
                    code = message.code(),
                    timeout = ?self.ask_timeout,
                    "ask timed out"
                );
                Err(AskTimeoutError::new(&message, self.ask_timeout).into())
            }
        }
    }

    /// Runs every handler registered for the message's code and reports the outcome.
    #[instrument(skip(self, message), fields(actor = %self.address, code = message.code(), message_id = message.id()))]
    pub async fn handle_message(self: Arc<Self>, message: Message) -> Message {
        let outcome = match MessageHandlers::get_handlers::<Self>(message.code()) {
            None => {
                trace!("no handlers, treating as handled");
                Ok(())
            }
            Some(handlers) => self.run_handlers(&handlers, &message).await,
        };

        let reply = match outcome {
            Ok(()) => Message::success(&message),
            Err(error) => {
                debug!(error = %error, "handling failed");
                Message::failure(&message, error)
            }
        };
        self.emit_to_listeners(&reply);
        reply
    }

    async fn run_handlers(
        self: &Arc<Self>,
        handlers: &[Arc<HandlerDescriptor<Self>>],
        message: &Message,
    ) -> Result<(), HandlerError> {
        for handler in handlers {
            let invocation = AssertUnwindSafe(handler.invoke(self.clone(), message.clone()))
                .catch_unwind()
                .await;
            match invocation {
                Ok(Ok(_)) => {}
                Ok(Err(error)) => return Err(error.into()),
                Err(payload) => {
                    let info = handler.info();
                    let panic = panic_message(payload.as_ref());
                    error!(method = info.method, panic = %panic, "handler panicked");
                    return Err(HandlerError::new(HandlerPanic {
                        owner: info.owner,
                        method: info.method,
                        panic,
                    }));
                }
            }
        }
        Ok(())
    }

    /// Adds the subscription's listener. Subscribing an actor to itself is ignored.
    pub fn subscribe(&self, subscribe: &Subscribe) {
        let listener = &subscribe.listener;
        if listener.address() == self.address() {
            trace!(actor = %self.address, "ignoring self-subscription");
            return;
        }
        match &subscribe.message_types {
            Some(message_types) => {
                for message_type in message_types {
                    self.listeners
                        .entry(message_type.code)
                        .or_default()
                        .insert(listener.clone());
                }
            }
            None => {
                self.everything_listeners.write().insert(listener.clone());
            }
        }
        trace!(actor = %self.address, listener = %listener, "listener added");
    }

    /// Tells `message` to every catch-all listener, then to every listener of its code.
    pub fn emit_to_listeners(&self, message: &Message) {
        let everything = self.listeners();
        let by_code = self.listeners_for(message.code());
        for listener in everything.iter().chain(&by_code) {
            listener.tell(message.clone());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl<A: Actor> Debug for ManagedActor<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedActor")
            .field("address", &self.address)
            .field("model", &type_name::<A>())
            .field("mailbox", &self.mailbox_len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<A: Actor> ActorCell for ManagedActor<A> {
    fn address(&self) -> &str {
        &self.address
    }

    fn type_name(&self) -> &'static str {
        type_name::<A>()
    }

    fn tell(&self, message: Message) {
        ManagedActor::tell(self, message);
    }

    async fn ask(&self, message: Message) -> Result<AskResponse, AskError> {
        ManagedActor::ask(self, message).await
    }

    fn mailbox_len(&self) -> usize {
        ManagedActor::mailbox_len(self)
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
