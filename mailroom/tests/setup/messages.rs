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
#![allow(dead_code)]

use mailroom::prelude::*;

#[mailroom_message(code = "test.ping")]
pub struct Ping;

#[mailroom_message(code = "test.pong")]
pub struct Pong;

#[mailroom_message(code = "test.increment")]
pub struct Increment {
    pub by: u64,
}

/// Makes the counter's second handler fail.
#[mailroom_message(code = "test.fail")]
pub struct Fail {
    pub cause: String,
}

/// Makes the counter's handler panic.
#[mailroom_message(code = "test.explode")]
pub struct Explode;

/// A handler that never finishes.
#[mailroom_message(code = "test.stall")]
pub struct Stall;

/// Journaled work that takes `millis` to complete.
#[mailroom_message(code = "test.work")]
pub struct Work {
    pub label: String,
    pub millis: u64,
}
