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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::handling::HandlerInfo;
use crate::message::Message;

/// Observes every bound handler invocation.
///
/// An error from `before_handling` fails the handler before it runs. Errors from
/// `after_handling` are logged and otherwise ignored.
#[async_trait]
pub trait HandlingObserver: Send + Sync {
    async fn before_handling(&self, _message: &Message, _handler: &HandlerInfo) -> anyhow::Result<()> {
        Ok(())
    }

    async fn after_handling(&self, _message: &Message, _handler: &HandlerInfo) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Handle returned by [`HandlerEvents::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

lazy_static! {
    static ref OBSERVERS: RwLock<Vec<(ObserverId, Arc<dyn HandlingObserver>)>> =
        RwLock::new(Vec::new());
}

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

/// The process-wide list of [`HandlingObserver`]s.
pub struct HandlerEvents;

impl HandlerEvents {
    pub fn subscribe(observer: Arc<dyn HandlingObserver>) -> ObserverId {
        let id = ObserverId(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed));
        OBSERVERS.write().push((id, observer));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(id: ObserverId) -> bool {
        let mut observers = OBSERVERS.write();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    fn snapshot() -> Vec<Arc<dyn HandlingObserver>> {
        OBSERVERS
            .read()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }

    pub(crate) async fn before_handling(
        message: &Message,
        handler: &HandlerInfo,
    ) -> anyhow::Result<()> {
        for observer in Self::snapshot() {
            observer.before_handling(message, handler).await?;
        }
        Ok(())
    }

    pub(crate) async fn after_handling(
        message: &Message,
        handler: &HandlerInfo,
    ) -> anyhow::Result<()> {
        for observer in Self::snapshot() {
            observer.after_handling(message, handler).await?;
        }
        Ok(())
    }
}
