//
// Copyright 2025-2026 The Wulin Project Developers. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Cancellable tick tasks
//!
//! Sustained effects (healing meditation, timed buffs) run as named tokio
//! tasks keyed by owner and name. Scheduling the same key again replaces
//! the running task; cancellation is explicit through a
//! [`CancellationToken`], never by dropping a handle on the floor.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// What a periodic tick wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

type TaskKey = (Uuid, &'static str);

/// Registry of running tasks. Shared behind an `Arc`; all methods take
/// `&self`.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Mutex<HashMap<TaskKey, CancellationToken>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `tick` every `period` until it returns [`TickControl::Stop`] or
    /// the task is cancelled. The first tick fires one full period after
    /// scheduling. Re-scheduling the same key cancels the previous task.
    pub fn spawn_interval<F>(&self, owner: Uuid, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        let guard = self.install(owner, name);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    _ = interval.tick() => {
                        if tick() == TickControl::Stop {
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Run `action` once after `delay`, unless cancelled first.
    pub fn spawn_once<F>(&self, owner: Uuid, name: &'static str, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.install(owner, name);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => action(),
            }
        });
    }

    /// Cancel the task for this key. Returns whether one was registered.
    pub fn cancel(&self, owner: Uuid, name: &'static str) -> bool {
        match self.tasks().remove(&(owner, name)) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every task belonging to `owner`. Called on death and logout.
    pub fn cancel_all_for(&self, owner: Uuid) {
        let mut tasks = self.tasks();
        tasks.retain(|(task_owner, _), token| {
            if *task_owner == owner {
                token.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Whether a live token is registered for this key. A task that stopped
    /// itself may still report true until its key is reused or cancelled.
    pub fn is_scheduled(&self, owner: Uuid, name: &'static str) -> bool {
        self.tasks()
            .get(&(owner, name))
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Replace any previous token for the key with a fresh one.
    fn install(&self, owner: Uuid, name: &'static str) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.tasks().insert((owner, name), token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<TaskKey, CancellationToken>> {
        // A panicked task holding the lock must not wedge everyone else.
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
