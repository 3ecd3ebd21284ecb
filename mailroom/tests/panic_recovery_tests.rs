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

//! Panics inside handlers are caught and reported as `HandlerPanic` errors.
//!
//! These tests use `#[tokio::test]` instead of `#[mailroom_test]`: the latter fails
//! any test in which a panic is raised, including the ones caught by the runtime.

use mailroom::prelude::*;

use crate::setup::{
    actors::{counter::Counter, recorder::Recorder},
    initialize_tracing, isolated_system,
    messages::{Explode, Increment},
};

mod setup;

/// Tests that a panicking handler is reported to listeners and the actor keeps going.
#[tokio::test(flavor = "multi_thread")]
async fn actor_keeps_processing_after_a_handler_panic() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create(Counter::default());
    let recorder = system.create(Recorder::default());
    counter.subscribe(&recorder, None);
    system.settle().await;

    counter.tell(Explode);
    system.settle().await;
    counter.tell(Increment { by: 2 });
    counter.tell(Increment { by: 3 });
    system.settle().await;

    let actor = system
        .lookup::<Counter>(counter.address())
        .expect("counter is registered");
    assert_eq!(actor.model.total(), 5);

    let outcomes = system
        .lookup::<Recorder>(recorder.address())
        .expect("recorder is registered")
        .model
        .outcomes();
    assert_eq!(outcomes.len(), 3);
    let error = outcomes[0].error().expect("the panic is reported as an error");
    let panic = error
        .downcast_ref::<HandlerPanic>()
        .expect("a handler panic");
    assert_eq!(panic.method, "explode");
    assert_eq!(panic.panic, "counter exploded");
    assert!(panic.owner.ends_with("Counter"));
    assert_eq!(error.code(), Some(HandlerPanic::CODE));
    assert!(outcomes[1..].iter().all(is_success_message));
    Ok(())
}

/// Tests that `ask` resolves with an `ErrorMessage` when the handler panics.
#[tokio::test]
async fn ask_reports_a_handler_panic() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create(Counter::default());

    let response = counter.ask(Explode).await?;

    assert!(!response.is_success());
    let error = response.error.expect("handler error");
    assert!(error.is::<HandlerPanic>());
    assert!(error.to_string().ends_with("::explode panicked: counter exploded"));

    let after = counter.ask(Increment { by: 1 }).await?;
    assert!(after.is_success());
    Ok(())
}
