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

use std::any::{type_name, TypeId};
use std::fmt::{Debug, Display};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use tracing::*;

use crate::handling::binding::{Binding, BoundHandler};
use crate::handling::{
    Delivery, ErrorFilter, HandlerDescriptor, HandlerFuture, HandlerInfo, MessageHandlers,
    ReasonFilter,
};
use crate::message::{
    register_error_code, ErrorCode, ErrorMessage, Message, MessageFactory, MessageKind,
    MessageType, SuccessMessage,
};

/// Values a handler closure may resolve to.
///
/// Only a returned [`SuccessMessage`] or [`ErrorMessage`] is kept as the invocation's
/// result; anything else is discarded.
pub trait HandlerReturn: Send + 'static {
    fn into_reply(self) -> Option<Message>;
}

impl HandlerReturn for () {
    fn into_reply(self) -> Option<Message> {
        None
    }
}

impl HandlerReturn for Message {
    fn into_reply(self) -> Option<Message> {
        Some(self)
    }
}

impl HandlerReturn for Option<Message> {
    fn into_reply(self) -> Option<Message> {
        self
    }
}

fn error_is<E>(error: &anyhow::Error) -> bool
where
    E: Display + Debug + Send + Sync + 'static,
{
    error.is::<E>()
}

fn register_type<M: MessageKind>() -> MessageType {
    if let Err(error) = MessageFactory::register::<M>() {
        error!(%error, "message type registration failed");
    }
    MessageType::of::<M>()
}

/// Declares the handlers of an owning type `T`.
///
/// Built once per type; every `receive*` call starts a [`HandlerBuilder`] that is
/// committed to [`MessageHandlers`] by its terminal `handle`.
///
/// ```rust,ignore
/// let mut table = HandlerTable::<Counter>::new();
/// table
///     .receive::<Increment>("increment")
///     .handle(|counter, delivery| async move {
///         counter.add(delivery.payload::<Increment>().map_or(0, |inc| inc.by));
///         Ok(())
///     });
/// table
///     .receive_error::<Increment>("increment_failed")
///     .error::<Overflow>()
///     .handle(|counter, delivery| async move {
///         counter.reset();
///         Ok(())
///     });
/// ```
pub struct HandlerTable<T> {
    owner_name: &'static str,
    registered: Vec<HandlerInfo>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Default for HandlerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> HandlerTable<T> {
    pub fn new() -> Self {
        Self::named(type_name::<T>())
    }

    /// A table whose handlers report `owner_name` as their owner.
    pub fn named(owner_name: &'static str) -> Self {
        Self {
            owner_name,
            registered: Vec::new(),
            _owner: PhantomData,
        }
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// Handlers committed through this table so far, in order.
    pub fn registered(&self) -> &[HandlerInfo] {
        &self.registered
    }

    /// Handles messages of type `M`.
    pub fn receive<M: MessageKind>(&mut self, method: &'static str) -> HandlerBuilder<'_, T> {
        let message = register_type::<M>();
        HandlerBuilder::new(self, method, vec![message], None)
    }

    /// Handles messages of any of `message_types` with one handler.
    ///
    /// One descriptor is committed per type, each sharing the same handler and the
    /// same filters, so a message reaches it at its own position in that code's
    /// registration order. The types are not registered with the [`MessageFactory`];
    /// use [`MessageFactory::register`] to obtain them when they must decode from JSON.
    pub fn receive_any(
        &mut self,
        method: &'static str,
        message_types: &[MessageType],
    ) -> HandlerBuilder<'_, T> {
        HandlerBuilder::new(self, method, message_types.to_vec(), None)
    }

    /// Handles the [`SuccessMessage`] emitted after an `M` was handled. The delivery's
    /// `message` is the `M`.
    pub fn receive_success<M: MessageKind>(
        &mut self,
        method: &'static str,
    ) -> HandlerBuilder<'_, T> {
        let reason = register_type::<M>();
        HandlerBuilder::new(
            self,
            method,
            vec![MessageType::of::<SuccessMessage>()],
            Some(reason),
        )
    }

    /// Handles the [`ErrorMessage`] emitted after handling an `M` failed. The delivery's
    /// `message` is the `M`.
    pub fn receive_error<M: MessageKind>(&mut self, method: &'static str) -> HandlerBuilder<'_, T> {
        let reason = register_type::<M>();
        HandlerBuilder::new(
            self,
            method,
            vec![MessageType::of::<ErrorMessage>()],
            Some(reason),
        )
    }
}

/// One handler being declared on a [`HandlerTable`].
#[must_use = "a handler is only registered by `handle`"]
pub struct HandlerBuilder<'a, T> {
    table: &'a mut HandlerTable<T>,
    method: &'static str,
    messages: Vec<MessageType>,
    receive_reason: Option<MessageType>,
    reason_filters: Vec<ReasonFilter>,
    error_filters: Vec<ErrorFilter>,
}

impl<'a, T: Send + Sync + 'static> HandlerBuilder<'a, T> {
    fn new(
        table: &'a mut HandlerTable<T>,
        method: &'static str,
        messages: Vec<MessageType>,
        receive_reason: Option<MessageType>,
    ) -> Self {
        Self {
            table,
            method,
            messages,
            receive_reason,
            reason_filters: Vec::new(),
            error_filters: Vec::new(),
        }
    }

    fn with_reason<R: MessageKind>(mut self, bind: bool) -> Self {
        let reason = register_type::<R>();
        self.reason_filters.push(ReasonFilter {
            method: self.method,
            reason,
            bind,
        });
        self
    }

    /// Accepts the message only when its reason is an `R`, and binds the reason.
    /// Repeat to accept several reason types.
    pub fn reason<R: MessageKind>(self) -> Self {
        self.with_reason::<R>(true)
    }

    /// Like [`reason`](Self::reason) without binding.
    pub fn reason_unbound<R: MessageKind>(self) -> Self {
        self.with_reason::<R>(false)
    }

    /// Accepts an error message only when its error is an `E` or carries `E::CODE`,
    /// and binds the error.
    pub fn error<E>(mut self) -> Self
    where
        E: ErrorCode + Display + Debug + Send + Sync + 'static,
    {
        register_error_code::<E>();
        self.error_filters.push(ErrorFilter::new(
            self.method,
            type_name::<E>(),
            Some(E::CODE),
            true,
            error_is::<E>,
        ));
        self
    }

    /// Accepts an error message only when its error is an `E`, and binds the error.
    pub fn error_type<E>(mut self) -> Self
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.error_filters.push(ErrorFilter::new(
            self.method,
            type_name::<E>(),
            None,
            true,
            error_is::<E>,
        ));
        self
    }

    /// Commits the handler, once per message type it was declared for.
    pub fn handle<F, Fut, R>(self, handler: F) -> &'a mut HandlerTable<T>
    where
        F: Fn(Arc<T>, Delivery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: HandlerReturn,
    {
        let HandlerBuilder {
            table,
            method,
            messages,
            receive_reason,
            reason_filters,
            error_filters,
        } = self;
        let owner = TypeId::of::<T>();
        if messages.is_empty() {
            warn!(owner = table.owner_name, method, "handler declared for no message types");
            return table;
        }
        for filter in reason_filters {
            MessageHandlers::set_reason_filter_for(owner, filter);
        }
        for filter in error_filters {
            MessageHandlers::set_error_filter_for(owner, filter);
        }

        let bound: BoundHandler<T> =
            Arc::new(move |target: Arc<T>, delivery: Delivery| -> HandlerFuture {
                handler(target, delivery)
                    .map(|result| result.map(HandlerReturn::into_reply))
                    .boxed()
            });
        for message in messages {
            let info = HandlerInfo {
                owner: table.owner_name,
                method,
                message,
            };
            let binding = Binding {
                owner,
                info: info.clone(),
                receive_reason,
            };
            MessageHandlers::set_handler(HandlerDescriptor::<T>::new(
                info.clone(),
                binding.bind(bound.clone()),
            ));
            table.registered.push(info);
        }
        table
    }
}
