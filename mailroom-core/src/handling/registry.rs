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

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use tracing::*;

use crate::handling::{ErrorFilter, ReasonFilter};
use crate::message::{Message, MessageType};

/// The future a handler invocation resolves to: a [`SuccessMessage`] or [`ErrorMessage`]
/// the handler chose to return, or nothing.
///
/// [`SuccessMessage`]: crate::SuccessMessage
/// [`ErrorMessage`]: crate::ErrorMessage
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<Option<Message>>>;

type HandlerFn<T> = dyn Fn(Arc<T>, Message) -> HandlerFuture + Send + Sync;

/// Identifies a registered handler: who owns it, its name, and what it handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerInfo {
    pub owner: &'static str,
    pub method: &'static str,
    pub message: MessageType,
}

/// A handler bound to an owning type `T`.
pub struct HandlerDescriptor<T> {
    info: HandlerInfo,
    handle: Box<HandlerFn<T>>,
}

impl<T> HandlerDescriptor<T> {
    pub fn new<F>(info: HandlerInfo, handle: F) -> Self
    where
        F: Fn(Arc<T>, Message) -> HandlerFuture + Send + Sync + 'static,
    {
        Self {
            info,
            handle: Box::new(handle),
        }
    }

    pub fn info(&self) -> &HandlerInfo {
        &self.info
    }

    /// Runs the handler against `target`. An inapplicable message resolves to `Ok(None)`.
    pub fn invoke(&self, target: Arc<T>, message: Message) -> HandlerFuture {
        (self.handle)(target, message)
    }
}

impl<T> Debug for HandlerDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("info", &self.info)
            .finish()
    }
}

/// A handler whose owning type is not statically known.
///
/// Returned by [`MessageHandlers::get_handlers_by_code`]; the target is downcast on
/// invocation.
pub trait ErasedHandler: Send + Sync {
    fn info(&self) -> &HandlerInfo;

    fn owner_type(&self) -> TypeId;

    /// Invokes the handler, or returns `None` when `target` is not of the owning type.
    fn invoke_any(
        &self,
        target: Arc<dyn Any + Send + Sync>,
        message: Message,
    ) -> Option<HandlerFuture>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Send + Sync + 'static> ErasedHandler for HandlerDescriptor<T> {
    fn info(&self) -> &HandlerInfo {
        &self.info
    }

    fn owner_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn invoke_any(
        &self,
        target: Arc<dyn Any + Send + Sync>,
        message: Message,
    ) -> Option<HandlerFuture> {
        let target = target.downcast::<T>().ok()?;
        Some(self.invoke(target, message))
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

type HandlersByCode = HashMap<&'static str, Vec<Arc<dyn ErasedHandler>>>;

lazy_static! {
    static ref HANDLERS_BY_TYPE: DashMap<TypeId, HandlersByCode> = DashMap::new();
    static ref HANDLERS_BY_CODE: DashMap<&'static str, Vec<Arc<dyn ErasedHandler>>> =
        DashMap::new();
    static ref REASON_FILTERS: DashMap<(TypeId, &'static str), Vec<ReasonFilter>> =
        DashMap::new();
    static ref ERROR_FILTERS: DashMap<(TypeId, &'static str), Vec<ErrorFilter>> =
        DashMap::new();
}

/// The process-wide, append-only handler registry.
pub struct MessageHandlers;

impl MessageHandlers {
    /// Appends a handler for `T` to both the per-type and the by-code index.
    pub fn set_handler<T: Send + Sync + 'static>(descriptor: HandlerDescriptor<T>) {
        let code = descriptor.info.message.code;
        trace!(
            owner = descriptor.info.owner,
            method = descriptor.info.method,
            code,
            "registering handler"
        );
        let handler: Arc<dyn ErasedHandler> = Arc::new(descriptor);
        HANDLERS_BY_TYPE
            .entry(TypeId::of::<T>())
            .or_default()
            .entry(code)
            .or_default()
            .push(handler.clone());
        HANDLERS_BY_CODE.entry(code).or_default().push(handler);
    }

    /// Handlers of `T` for `code`, in registration order; `None` when there are none.
    pub fn get_handlers<T: Send + Sync + 'static>(
        code: &str,
    ) -> Option<Vec<Arc<HandlerDescriptor<T>>>> {
        let by_type = HANDLERS_BY_TYPE.get(&TypeId::of::<T>())?;
        let handlers: Vec<_> = by_type
            .get(code)?
            .iter()
            .filter_map(|handler| {
                handler
                    .clone()
                    .into_any()
                    .downcast::<HandlerDescriptor<T>>()
                    .ok()
            })
            .collect();
        (!handlers.is_empty()).then_some(handlers)
    }

    /// Every handler for `code`, whatever its owner, in registration order.
    pub fn get_handlers_by_code(code: &str) -> Option<Vec<Arc<dyn ErasedHandler>>> {
        HANDLERS_BY_CODE
            .get(code)
            .map(|handlers| handlers.value().clone())
            .filter(|handlers| !handlers.is_empty())
    }

    pub fn has_handlers<T: 'static>(code: &str) -> bool {
        HANDLERS_BY_TYPE
            .get(&TypeId::of::<T>())
            .is_some_and(|by_type| by_type.get(code).is_some_and(|list| !list.is_empty()))
    }

    pub fn set_reason_filter<T: 'static>(filter: ReasonFilter) {
        Self::set_reason_filter_for(TypeId::of::<T>(), filter);
    }

    pub(crate) fn set_reason_filter_for(owner: TypeId, filter: ReasonFilter) {
        REASON_FILTERS
            .entry((owner, filter.method))
            .or_default()
            .push(filter);
    }

    pub fn reason_filters<T: 'static>(method: &'static str) -> Option<Vec<ReasonFilter>> {
        Self::reason_filters_for(TypeId::of::<T>(), method)
    }

    pub(crate) fn reason_filters_for(
        owner: TypeId,
        method: &'static str,
    ) -> Option<Vec<ReasonFilter>> {
        REASON_FILTERS
            .get(&(owner, method))
            .map(|filters| filters.value().clone())
    }

    pub fn set_error_filter<T: 'static>(filter: ErrorFilter) {
        Self::set_error_filter_for(TypeId::of::<T>(), filter);
    }

    pub(crate) fn set_error_filter_for(owner: TypeId, filter: ErrorFilter) {
        ERROR_FILTERS
            .entry((owner, filter.method))
            .or_default()
            .push(filter);
    }

    pub fn error_filters<T: 'static>(method: &'static str) -> Option<Vec<ErrorFilter>> {
        Self::error_filters_for(TypeId::of::<T>(), method)
    }

    pub(crate) fn error_filters_for(
        owner: TypeId,
        method: &'static str,
    ) -> Option<Vec<ErrorFilter>> {
        ERROR_FILTERS
            .get(&(owner, method))
            .map(|filters| filters.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use mailroom_test::prelude::*;

    use super::*;
    use crate::message::SuccessMessage;

    struct Ledger;
    struct Audit;

    fn info(owner: &'static str, method: &'static str) -> HandlerInfo {
        HandlerInfo {
            owner,
            method,
            message: MessageType {
                code: "test.registry.entry",
                name: "Entry",
            },
        }
    }

    fn answer(message: Message) -> HandlerFuture {
        async move { Ok(Some(Message::success(&message))) }.boxed()
    }

    #[test]
    fn lookups_return_none_when_nothing_is_registered() {
        assert!(MessageHandlers::get_handlers::<Ledger>("test.registry.nothing").is_none());
        assert!(MessageHandlers::get_handlers_by_code("test.registry.nothing").is_none());
        assert!(!MessageHandlers::has_handlers::<Ledger>("test.registry.nothing"));
        assert!(MessageHandlers::reason_filters::<Ledger>("nothing").is_none());
        assert!(MessageHandlers::error_filters::<Ledger>("nothing").is_none());
    }

    #[mailroom_test]
    async fn handlers_keep_registration_order_per_type_and_by_code() -> anyhow::Result<()> {
        MessageHandlers::set_handler(HandlerDescriptor::<Ledger>::new(
            info("Ledger", "first"),
            |_, message| answer(message),
        ));
        MessageHandlers::set_handler(HandlerDescriptor::<Audit>::new(
            info("Audit", "audit"),
            |_, _| async { Ok(None) }.boxed(),
        ));
        MessageHandlers::set_handler(HandlerDescriptor::<Ledger>::new(
            info("Ledger", "second"),
            |_, message| answer(message),
        ));

        let ledger = MessageHandlers::get_handlers::<Ledger>("test.registry.entry")
            .expect("ledger handlers");
        let methods: Vec<_> = ledger.iter().map(|handler| handler.info().method).collect();
        assert_eq!(methods, vec!["first", "second"]);

        let all = MessageHandlers::get_handlers_by_code("test.registry.entry")
            .expect("handlers by code");
        let methods: Vec<_> = all.iter().map(|handler| handler.info().method).collect();
        assert_eq!(methods, vec!["first", "audit", "second"]);

        let message = Message::new(SuccessMessage);
        let outcome = ledger[0].invoke(Arc::new(Ledger), message.clone()).await?;
        assert_eq!(
            outcome.and_then(|reply| reply.reason().cloned()),
            Some(message.clone())
        );

        let target: Arc<dyn Any + Send + Sync> = Arc::new(Audit);
        assert!(all[0].invoke_any(target.clone(), message.clone()).is_none());
        let audited = all[1].invoke_any(target, message).expect("an Audit target");
        assert!(audited.await?.is_none());
        assert_eq!(all[1].owner_type(), TypeId::of::<Audit>());
        Ok(())
    }
}
