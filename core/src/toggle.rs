// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Optimistic todo completion toggling.
//!
//! Completing a todo takes a network round trip. Toggling the same todo
//! again while that round trip is in flight must not race a second request
//! against it; instead the second toggle flags the in-flight completion to
//! be reverted as soon as it lands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tempo_remote::{DoneTodo, TodoEvent};

use crate::Error;
use crate::dispatch::RemoteApi;
use crate::localdb::LocalDb;

/// Outcome of a toggle that performed work.
#[derive(Debug, Clone)]
pub enum ToggleResult {
    /// The todo was open and a completion is now recorded for it.
    Completed(DoneTodo),

    /// The todo's completion was reverted; it is open again.
    Reverted(TodoEvent),
}

/// In-flight operation on one todo. Absence means idle.
#[derive(Debug, Clone, Copy)]
enum ToggleState {
    /// A completion request is in flight. When flagged, it is reverted as
    /// soon as it lands.
    Completing { revert_requested: bool },

    /// A revert request is in flight.
    Reverting,
}

/// What a toggle call should do, decided under the state lock.
enum Decision {
    /// Idle, but the todo's current state is needed to pick a direction.
    NeedTarget,

    /// Idle and open: run a completion.
    Complete(TodoEvent),

    /// Idle and done: run a revert.
    Revert {
        todo: TodoEvent,
        done_id: Option<String>,
    },

    /// A completion is in flight and now flagged for reversal.
    Flagged,

    /// A revert is in flight; there is nothing further to toggle to.
    Ignored,
}

/// Serializes completion toggles per todo uid.
#[derive(Debug, Clone)]
pub(crate) struct ToggleGuard {
    remote: Arc<dyn RemoteApi>,
    db: LocalDb,
    states: Arc<Mutex<HashMap<String, ToggleState>>>,
}

impl ToggleGuard {
    pub fn new(remote: Arc<dyn RemoteApi>, db: LocalDb) -> Self {
        Self {
            remote,
            db,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Toggles the completion state of a todo.
    ///
    /// Returns `None` when the call only flagged an in-flight completion for
    /// reversal, or when a revert was already in flight.
    pub async fn toggle(&self, uid: &str) -> Result<Option<ToggleResult>, Error> {
        let mut target: Option<TodoEvent> = None;
        loop {
            match self.decide(uid, target.take()) {
                Decision::NeedTarget => {
                    let Some(todo) = self.db.todos.get(uid).await? else {
                        return Err(Error::NotFound {
                            what: "todo",
                            uid: uid.to_string(),
                        });
                    };
                    target = Some(todo);
                }
                Decision::Complete(todo) => return self.run_complete(todo).await.map(Some),
                Decision::Revert { todo, done_id } => {
                    let reverted = self.finish_revert(&todo.uid, done_id).await?;
                    return Ok(Some(ToggleResult::Reverted(reverted)));
                }
                Decision::Flagged | Decision::Ignored => return Ok(None),
            }
        }
    }

    /// Picks the action for a toggle. Looking up and installing the state is
    /// one critical section, so two concurrent toggles can never both start a
    /// request for the same uid.
    fn decide(&self, uid: &str, target: Option<TodoEvent>) -> Decision {
        let mut states = self.lock_states();
        if let Some(state) = states.get_mut(uid) {
            return match state {
                ToggleState::Completing { revert_requested } => {
                    *revert_requested = true;
                    Decision::Flagged
                }
                ToggleState::Reverting => Decision::Ignored,
            };
        }

        match target {
            None => Decision::NeedTarget,
            Some(todo) if todo.is_done() => {
                states.insert(uid.to_string(), ToggleState::Reverting);
                let done_id = todo.done_id.clone();
                Decision::Revert { todo, done_id }
            }
            Some(todo) => {
                states.insert(
                    uid.to_string(),
                    ToggleState::Completing {
                        revert_requested: false,
                    },
                );
                Decision::Complete(todo)
            }
        }
    }

    async fn run_complete(&self, todo: TodoEvent) -> Result<ToggleResult, Error> {
        let done = match self.remote.complete_todo(&todo).await {
            Ok(done) => done,
            Err(e) => {
                self.clear(&todo.uid);
                return Err(e.into());
            }
        };

        if let Err(e) = self.db.todos.upsert(&done.todo).await {
            tracing::warn!(uid = %todo.uid, error = %e, "failed to mirror completed todo");
        }

        // This call installed Completing; nothing else replaces it while the
        // request is in flight, so the flag read here is authoritative.
        let revert_requested = {
            let mut states = self.lock_states();
            let flagged = matches!(
                states.get(&todo.uid),
                Some(ToggleState::Completing {
                    revert_requested: true
                })
            );
            if flagged {
                states.insert(todo.uid.clone(), ToggleState::Reverting);
            } else {
                states.remove(&todo.uid);
            }
            flagged
        };

        if revert_requested {
            tracing::debug!(uid = %todo.uid, "completion was flagged, reverting");
            let done_id = done.done_id.clone();
            let reverted = self.finish_revert(&todo.uid, Some(done_id)).await?;
            Ok(ToggleResult::Reverted(reverted))
        } else {
            Ok(ToggleResult::Completed(done))
        }
    }

    async fn finish_revert(&self, uid: &str, done_id: Option<String>) -> Result<TodoEvent, Error> {
        let result = self.remote.revert_todo(uid, done_id.as_deref()).await;

        // The guard resets even on failure so the next toggle starts clean.
        self.clear(uid);

        let todo = result?;
        if let Err(e) = self.db.todos.upsert(&todo).await {
            tracing::warn!(uid, error = %e, "failed to mirror reverted todo");
        }
        Ok(todo)
    }

    fn clear(&self, uid: &str) {
        self.lock_states().remove(uid);
    }

    fn lock_states(&self) -> MutexGuard<'_, HashMap<String, ToggleState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
