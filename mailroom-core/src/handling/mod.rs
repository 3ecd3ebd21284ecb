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

//! Handler registration, lookup and dispatch binding.
//!
//! Handlers are registered once per owning type through a [`HandlerTable`] and stored in
//! [`MessageHandlers`], keyed by the owner's `TypeId` and the handled message code.
//! Each registered handler is wrapped by the binding step, which decides whether an
//! incoming message applies (matching code, reason filters, error filters) and builds
//! the [`Delivery`] the handler receives.

pub use binding::Delivery;
pub use events::{HandlerEvents, HandlingObserver, ObserverId};
pub use filters::{ErrorFilter, ReasonFilter};
pub use registry::{
    ErasedHandler, HandlerDescriptor, HandlerFuture, HandlerInfo, MessageHandlers,
};
pub use table::{HandlerBuilder, HandlerReturn, HandlerTable};

mod binding;
mod events;
mod filters;
mod registry;
mod table;
