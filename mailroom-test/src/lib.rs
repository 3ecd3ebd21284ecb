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
#![forbid(unsafe_code)]

//! Testing utilities for Mailroom actors.
//!
//! The [`mailroom_test`](prelude::mailroom_test) attribute turns an `async fn`
//! returning `anyhow::Result<()>` into a regular `#[test]` that runs
//! on its own Tokio runtime inside a `mailroom_test` tracing span. Panics raised
//! anywhere during the test, including inside spawned handler tasks, fail the test
//! with the panic location attached.
//!
//! ```rust,ignore
//! use mailroom_test::prelude::*;
//!
//! #[mailroom_test]
//! async fn pings() -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! #[mailroom_test(flavor = "current_thread")]
//! async fn pings_in_order() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

/// Common imports for test modules.
pub mod prelude {
    pub use mailroom_test_macro::mailroom_test;
}

#[doc(hidden)]
pub mod __private {
    pub use parking_lot;
    pub use tokio;
    pub use tracing;
}
