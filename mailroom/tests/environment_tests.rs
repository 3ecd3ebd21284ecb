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

use std::sync::Arc;

use mailroom::prelude::*;
use mailroom_test::prelude::*;

use crate::setup::{
    actors::counter::Counter,
    initialize_tracing, isolated_system,
    messages::{Increment, Ping},
};

mod setup;

#[mailroom_test]
async fn manager_falls_back_to_local() -> anyhow::Result<()> {
    initialize_tracing();
    let manager = EnvironmentManager::default();

    assert_eq!(manager.get_environment_by_address(None).name(), "local");
    assert_eq!(manager.get_environment_by_address(Some("plain")).name(), "local");
    assert_eq!(manager.get_environment_by_address(Some("mars://1")).name(), "local");
    assert_eq!(manager.get_environment_by_address(Some("local://1")).name(), "local");
    assert!(manager.get_environment_by_name("mars").is_none());
    assert!(manager.get_environment_by_name("local").is_some());
    Ok(())
}

/// Tests registering environments on a manager.
///
/// **Scenario:**
/// 1. A `vault` environment is registered, then registered again with a new resolver.
///
/// **Verification:**
/// - `vault://` addresses select it.
/// - The second registration replaced the first.
#[mailroom_test]
async fn manager_selects_registered_environments() -> anyhow::Result<()> {
    initialize_tracing();
    let manager = EnvironmentManager::default();
    manager.register(Environment::local_named("vault"));
    let replacement = Environment::local_named("vault");
    manager.register(replacement.clone());

    let selected = manager.get_environment_by_address(Some("vault://alpha"));
    assert_eq!(selected.name(), "vault");
    assert!(Arc::ptr_eq(selected.resolver(), replacement.resolver()));
    assert!(manager
        .get_environment_by_name("vault")
        .is_some_and(|found| Arc::ptr_eq(found.resolver(), replacement.resolver())));
    Ok(())
}

/// Tests actors living in a custom environment.
///
/// **Scenario:**
/// 1. A `vault` environment is registered with the system.
/// 2. A `Counter` is created at `vault://alpha` and told an `Increment`.
///
/// **Verification:**
/// - The actor is only reachable through its `vault://` address.
/// - Messages told through its ref reach it.
/// - Actors created without an address stay local.
#[mailroom_test]
async fn actors_can_live_in_a_custom_environment() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    system.register_environment(Environment::local_named("vault"));

    let counter = system.create_with(Counter::default(), CreateArgs::at("vault://alpha"));
    assert_eq!(counter.address(), "vault://alpha");
    assert!(system.resolve("vault://alpha").is_some());
    assert!(system.resolve("alpha").is_none());

    counter.tell(Increment { by: 3 });
    system.settle().await;
    let actor = system
        .lookup::<Counter>("vault://alpha")
        .expect("counter is registered");
    assert_eq!(actor.model.total(), 3);

    let local = system.create(Counter::default());
    assert!(local.address().starts_with("local://"));
    Ok(())
}

/// Tests the local transmitter against registered and unknown addresses.
#[mailroom_test]
async fn transmitter_delivers_only_to_registered_actors() -> anyhow::Result<()> {
    initialize_tracing();
    let system = isolated_system();
    let bench = Environment::local_named("bench");
    system.register_environment(bench.clone());
    system.create_with(Counter::default(), CreateArgs::at("bench://counter"));

    bench.transmitter().send("bench://nobody", Message::new(Ping));
    let missing = bench
        .transmitter()
        .request("bench://nobody", Message::new(Ping))
        .await;
    assert_eq!(
        missing.unwrap_err(),
        AskError::MissingActor(MissingActorError::new("bench://nobody"))
    );

    let response = bench
        .transmitter()
        .request("bench://counter", Message::new(Ping))
        .await?;
    assert!(response.is_success());
    assert!(bench.resolver().resolve("bench://counter").is_some());
    assert_eq!(bench.resolver().environment(), "bench");
    Ok(())
}
