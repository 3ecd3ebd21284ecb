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

use mailroom::prelude::*;
use parking_lot::Mutex;
use thiserror::Error;

use crate::setup::messages::{Explode, Fail, Increment, Ping, Stall};

#[derive(Debug, Error)]
#[error("counter refused: {0}")]
pub struct CounterError(pub String);

impl ErrorCode for CounterError {
    const CODE: &'static str = "COUNTER_REFUSED";
}

/// Adds up increments; fails, panics or stalls on request.
#[derive(Default)]
pub struct Counter {
    pub total: AtomicU64,
    pub checks: AtomicU64,
    pub after_failure: AtomicU64,
    pub starts: AtomicU64,
    pub me: Mutex<Option<ActorRef>>,
}

impl Counter {
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

impl Actor for Counter {
    fn handlers(table: &mut HandlerTable<ManagedActor<Self>>) {
        register_error_code::<CounterError>();
        table
            .receive::<Increment>("increment")
            .handle(|actor: Arc<ManagedActor<Counter>>, delivery| async move {
                let by = delivery.payload::<Increment>().map_or(0, |increment| increment.by);
                actor.model.total.fetch_add(by, Ordering::SeqCst);
                Ok(())
            });
        table
            .receive::<Ping>("ping")
            .handle(|_actor, _delivery| async move { Ok(()) });
        table
            .receive::<Fail>("check")
            .handle(|actor, _delivery| async move {
                actor.model.checks.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        table
            .receive::<Fail>("fail")
            .handle(|_actor, delivery| async move {
                let cause = delivery
                    .payload::<Fail>()
                    .map(|fail| fail.cause.clone())
                    .unwrap_or_default();
                Err::<(), _>(anyhow::Error::new(CounterError(cause)))
            });
        table
            .receive::<Fail>("after_fail")
            .handle(|actor, _delivery| async move {
                actor.model.after_failure.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        table
            .receive::<Explode>("explode")
            .handle(|_actor, delivery| async move {
                if delivery.payload::<Explode>().is_some() {
                    panic!("counter exploded");
                }
                Ok(())
            });
        table
            .receive::<Stall>("stall")
            .handle(|_actor, _delivery| async move {
                std::future::pending::<()>().await;
                Ok(())
            });
    }

    fn start(&self, me: &ActorRef) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.me.lock() = Some(me.clone());
    }
}
