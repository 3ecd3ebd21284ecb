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
use std::time::Duration;

use mailroom::prelude::*;
use parking_lot::Mutex;

use crate::setup::messages::Work;

/// Records when each piece of work starts and ends.
#[derive(Default)]
pub struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    fn write(&self, entry: String) {
        self.entries.lock().push(entry);
    }
}

impl Actor for Journal {
    fn handlers(table: &mut HandlerTable<ManagedActor<Self>>) {
        table
            .receive::<Work>("work")
            .handle(|actor, delivery| async move {
                let Some(work) = delivery.payload::<Work>().cloned() else {
                    return Ok(());
                };
                actor.model.write(format!("start:{}", work.label));
                tokio::time::sleep(Duration::from_millis(work.millis)).await;
                actor.model.write(format!("end:{}", work.label));
                Ok(())
            });
    }
}
