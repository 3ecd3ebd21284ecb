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

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use mailroom::prelude::*;
use mailroom_test::prelude::*;

use crate::setup::{
    actors::{counter::Counter, recorder::Recorder},
    initialize_tracing, isolated_system,
    messages::Increment,
};

mod setup;

/// Tests creating at a requested address and resolving it again.
///
/// **Scenario:**
/// 1. A `Counter` is created at the unqualified address `x`.
///
/// **Verification:**
/// - The ref carries the qualified address `local://x`.
/// - `resolve` finds it by either form; unknown addresses resolve to `None`.
/// - `get_ref` always returns a ref.
#[mailroom_test]
async fn created_actors_resolve_by_address() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create_with(Counter::default(), CreateArgs::at("x"));

    assert_eq!(counter.address(), "local://x");
    assert_eq!(
        system.resolve("x").map(|found| found.address().to_string()),
        Some("local://x".to_string())
    );
    assert_eq!(system.resolve("local://x"), Some(counter.clone()));
    assert!(system.resolve("y").is_none());
    assert!(system.resolve("local://y").is_none());

    let unknown = system.get_ref("y");
    assert_eq!(unknown.address(), "local://y");
    unknown.tell(Increment { by: 1 });
    Ok(())
}

/// Tests creating at an address that is already taken.
///
/// **Scenario:**
/// 1. A `Counter` is created at `desk`.
/// 2. A second `Counter` is created at `desk`.
/// 3. An `Increment` is told to `desk`.
///
/// **Verification:**
/// - `resolve` reports the address as taken before the second create.
/// - Both refs are the same address; the second actor replaced the first.
/// - Only the second actor counts the increment.
#[mailroom_test]
async fn creating_at_a_taken_address_replaces_the_actor() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let first = system.create_with(Counter::default(), CreateArgs::at("desk"));
    let original = system
        .lookup::<Counter>("desk")
        .expect("first counter is registered");
    assert_eq!(system.resolve("desk"), Some(first.clone()));

    let second = system.create_with(Counter::default(), CreateArgs::at("desk"));
    assert_eq!(first, second);
    let current = system
        .lookup::<Counter>("desk")
        .expect("second counter is registered");
    assert!(!Arc::ptr_eq(&original, &current));

    first.tell(Increment { by: 3 });
    system.settle().await;
    assert_eq!(current.model.total(), 3);
    assert_eq!(original.model.total(), 0);
    Ok(())
}

/// Tests that fresh addresses are numbered per environment.
#[mailroom_test]
async fn fresh_addresses_are_numbered() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();

    let first = system.create(Counter::default());
    let second = system.create(Recorder::default());

    assert_eq!(first.address(), "local://1");
    assert_eq!(second.address(), "local://2");
    Ok(())
}

/// Tests that `lookup` only hands out the actor as its own type.
#[mailroom_test]
async fn lookup_is_typed() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create(Counter::default());

    assert!(system.lookup::<Counter>(counter.address()).is_some());
    assert!(system.lookup::<Recorder>(counter.address()).is_none());
    assert!(system.lookup::<Counter>("local://404").is_none());
    Ok(())
}

/// Tests that settings changes apply to actors created afterwards.
#[mailroom_test]
async fn settings_apply_to_later_actors() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let before = system.create(Counter::default());

    system.set(|settings| settings.ask_timeout = Duration::from_millis(250));
    let after = system.create(Counter::default());
    let overridden = system.create_with(
        Counter::default(),
        CreateArgs::default().with_ask_timeout(Duration::from_millis(5)),
    );

    let timeout_of = |actor: &ActorRef| {
        system
            .lookup::<Counter>(actor.address())
            .map(|actor| actor.ask_timeout())
    };
    assert_eq!(timeout_of(&before), Some(CONFIG.ask_timeout()));
    assert_eq!(timeout_of(&after), Some(Duration::from_millis(250)));
    assert_eq!(timeout_of(&overridden), Some(Duration::from_millis(5)));
    assert_eq!(system.settings().ask_timeout, Duration::from_millis(250));
    Ok(())
}

/// Tests that refs compare and hash by address.
#[mailroom_test]
async fn refs_are_identified_by_address() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create_with(Counter::default(), CreateArgs::at("same"));
    let looked_up = system.get_ref("local://same");

    assert_eq!(counter, looked_up);
    assert_ne!(counter, system.get_ref("other"));
    let refs: HashSet<ActorRef> = [counter.clone(), looked_up, counter.clone()]
        .into_iter()
        .collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(counter.to_string(), "local://same");
    Ok(())
}

/// Tests that a ref serializes as its address and comes back as a working ref.
#[mailroom_test]
async fn refs_travel_as_addresses() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::global();
    let counter = system.create_with(Counter::default(), CreateArgs::at("serde-counter"));

    let json = serde_json::to_string(&counter)?;
    assert_eq!(json, "\"local://serde-counter\"");

    let restored: ActorRef = serde_json::from_str(&json)?;
    assert_eq!(restored, counter);
    restored.tell(Increment { by: 7 });
    system.settle().await;

    let actor = system
        .lookup::<Counter>("serde-counter")
        .expect("counter is registered");
    assert_eq!(actor.model.total(), 7);
    Ok(())
}

/// Tests that `settle` waits for work spawned while it waits.
#[mailroom_test]
async fn settle_waits_for_chained_work() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let counter = system.create(Counter::default());
    let recorder = system.create(Recorder::default());
    counter.subscribe(&recorder, None);
    system.settle().await;

    counter.tell(Increment { by: 2 });
    system.settle().await;

    assert_eq!(system.in_flight(), 0);
    let outcomes = system
        .lookup::<Recorder>(recorder.address())
        .expect("recorder is registered")
        .model
        .outcomes();
    assert_eq!(outcomes.len(), 1);
    Ok(())
}
