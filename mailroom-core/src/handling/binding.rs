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

use std::any::TypeId;
use std::sync::Arc;

use futures::future::{self, FutureExt};
use tracing::*;

use crate::handling::{HandlerEvents, HandlerFuture, HandlerInfo, MessageHandlers};
use crate::message::{
    is_error_message, is_success_message, HandlerError, Message, MessageKind, MessageType,
};

/// What a bound handler receives.
#[derive(Clone, Debug)]
pub struct Delivery {
    /// The matched message: the incoming one, or its reason for `receive_success` and
    /// `receive_error` handlers.
    pub message: Message,
    /// The message exactly as it arrived.
    pub incoming: Message,
    /// The matched reason, when a binding reason filter accepted it.
    pub reason: Option<Message>,
    /// The carried error, when a binding error filter accepted it.
    pub error: Option<HandlerError>,
}

impl Delivery {
    /// Downcasts the matched message's payload.
    pub fn payload<T: MessageKind>(&self) -> Option<&T> {
        self.message.payload::<T>()
    }
}

pub(crate) type BoundHandler<T> = Arc<dyn Fn(Arc<T>, Delivery) -> HandlerFuture + Send + Sync>;

pub(crate) struct Binding {
    pub(crate) owner: TypeId,
    pub(crate) info: HandlerInfo,
    pub(crate) receive_reason: Option<MessageType>,
}

impl Binding {
    /// Decides whether `incoming` applies and assembles the delivery.
    pub(crate) fn deliver(&self, incoming: &Message) -> Option<Delivery> {
        let message = match self.receive_reason {
            Some(_) => incoming.reason()?.clone(),
            None => incoming.clone(),
        };
        let expected = self.receive_reason.unwrap_or(self.info.message);
        if message.code() != expected.code {
            return None;
        }

        let reason = match MessageHandlers::reason_filters_for(self.owner, self.info.method) {
            None => None,
            Some(filters) => {
                let reason = message.reason()?;
                let filter = filters
                    .iter()
                    .find(|filter| filter.reason.code == reason.code())?;
                filter.bind.then(|| reason.clone())
            }
        };

        let error = match incoming.error() {
            None => None,
            Some(error) => {
                match MessageHandlers::error_filters_for(self.owner, self.info.method) {
                    None => None,
                    Some(filters) => {
                        let filter = filters.iter().find(|filter| filter.matches(error))?;
                        filter.bind.then(|| error.clone())
                    }
                }
            }
        };

        Some(Delivery {
            message,
            incoming: incoming.clone(),
            reason,
            error,
        })
    }

    pub(crate) fn bind<T: Send + Sync + 'static>(
        self,
        handler: BoundHandler<T>,
    ) -> impl Fn(Arc<T>, Message) -> HandlerFuture + Send + Sync + 'static {
        move |target: Arc<T>, incoming: Message| -> HandlerFuture {
            let Some(delivery) = self.deliver(&incoming) else {
                trace!(
                    owner = self.info.owner,
                    method = self.info.method,
                    code = incoming.code(),
                    "handler does not apply"
                );
                return future::ready(Ok(None)).boxed();
            };
            let info = self.info.clone();
            let handler = handler.clone();
            async move {
                let message = delivery.message.clone();
                HandlerEvents::before_handling(&message, &info).await?;
                let outcome = handler(target, delivery).await?;
                if let Err(error) = HandlerEvents::after_handling(&message, &info).await {
                    warn!(
                        owner = info.owner,
                        method = info.method,
                        error = %error,
                        "after_handling observer failed"
                    );
                }
                Ok(outcome.filter(|reply| is_success_message(reply) || is_error_message(reply)))
            }
            .boxed()
        }
    }
}
