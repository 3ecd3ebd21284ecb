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
use mailroom::prelude::*;
use parking_lot::Mutex;

/// Keeps every outcome message it is told about.
#[derive(Default)]
pub struct Recorder {
    received: Mutex<Vec<Message>>,
}

impl Recorder {
    pub fn received(&self) -> Vec<Message> {
        self.received.lock().clone()
    }

    /// Received outcomes, minus the acknowledgements of subscriptions.
    pub fn outcomes(&self) -> Vec<Message> {
        self.received
            .lock()
            .iter()
            .filter(|message| !message.reason().is_some_and(is_subscribe_message))
            .cloned()
            .collect()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.outcomes().iter().map(Message::code).collect()
    }
}

impl Actor for Recorder {
    fn handlers(table: &mut HandlerTable<ManagedActor<Self>>) {
        table
            .receive::<SuccessMessage>("on_success")
            .handle(|actor, delivery| async move {
                actor.model.received.lock().push(delivery.incoming);
                Ok(())
            });
        table
            .receive::<ErrorMessage>("on_error")
            .handle(|actor, delivery| async move {
                actor.model.received.lock().push(delivery.incoming);
                Ok(())
            });
    }
}
