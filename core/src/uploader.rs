// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The background upload loop.
//!
//! A single worker drains the pending queue oldest-first. A delivery that
//! fails or is cut short by a pause goes back to the end of the queue with
//! its fail count bumped; once the count reaches the attempt limit the task
//! stays behind as a dead letter.

use std::sync::Arc;

use tokio::sync::watch;

use crate::Error;
use crate::dispatch::Dispatcher;
use crate::localdb::LocalDb;
use crate::types::{UploadTask, now_ms};

#[derive(Debug)]
struct Inner {
    db: LocalDb,
    dispatcher: Dispatcher,
    running: watch::Sender<bool>,
    paused: watch::Sender<bool>,
}

/// Drains pending uploads in the background, one at a time.
#[derive(Debug, Clone)]
pub(crate) struct Uploader {
    inner: Arc<Inner>,
}

impl Uploader {
    pub fn new(db: LocalDb, dispatcher: Dispatcher) -> Self {
        let (running, _) = watch::channel(false);
        let (paused, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                db,
                dispatcher,
                running,
                paused,
            }),
        }
    }

    /// Enqueues a task. The running worker picks it up on its next pop; when
    /// no worker is running it waits for the next [`resume`](Self::resume).
    pub async fn append(&self, task: &UploadTask) -> Result<(), Error> {
        Ok(self.inner.db.upload_tasks.push(task).await?)
    }

    pub async fn append_all(&self, tasks: &[UploadTask]) -> Result<(), Error> {
        for task in tasks {
            self.inner.db.upload_tasks.push(task).await?;
        }
        Ok(())
    }

    /// Unpauses and starts a drain worker unless one is already running.
    pub fn resume(&self) {
        self.inner.paused.send_replace(false);

        // Test-and-set: only the caller that flips `running` spawns a worker.
        let started = self.inner.running.send_if_modified(|running| {
            if *running {
                false
            } else {
                *running = true;
                true
            }
        });
        if started {
            tokio::spawn(drain(self.inner.clone()));
        }
    }

    /// Asks the worker to stop.
    ///
    /// An in-flight dispatch is abandoned and treated like any other failed
    /// attempt: the task goes back to the queue with its fail count bumped.
    pub fn pause(&self) {
        self.inner.paused.send_replace(true);
    }

    /// Waits until no drain worker is running.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.inner.running.subscribe();
        // The sender lives in self, so the channel cannot close under us.
        let _ = rx.wait_for(|running| !running).await;
    }
}

async fn drain(inner: Arc<Inner>) {
    tracing::debug!("upload drain started");
    loop {
        if *inner.paused.borrow() {
            break;
        }

        let task = match inner.db.upload_tasks.pop().await {
            Ok(Some(task)) => task,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to pop upload task");
                break;
            }
        };

        let mut paused_rx = inner.paused.subscribe();
        tokio::select! {
            result = inner.dispatcher.dispatch(&task) => match result {
                Ok(()) => {
                    tracing::debug!(uid = %task.uid, kind = %task.kind, "upload delivered");
                }
                Err(e) => {
                    tracing::warn!(uid = %task.uid, kind = %task.kind, error = %e, "upload failed");
                    requeue_failed(&inner, task).await;
                }
            },
            // Discard the watch::Ref inside the block; holding it across the
            // requeue await would make this future non-Send.
            _ = async { let _ = paused_rx.wait_for(|paused| *paused).await; } => {
                // Dropping the dispatch future abandons the request mid-flight.
                requeue_failed(&inner, task).await;
            }
        }
    }

    // A task appended after the final empty pop waits for the next resume;
    // appends never wake the worker on their own.
    inner.running.send_replace(false);
    tracing::debug!("upload drain stopped");
}

async fn requeue_failed(inner: &Inner, mut task: UploadTask) {
    task.fail_count += 1;
    if task.is_dead() {
        // Dead letters keep their timestamp, recording when the change was
        // originally attempted.
        tracing::warn!(uid = %task.uid, kind = %task.kind, "upload dead-lettered");
    } else {
        task.timestamp = now_ms();
    }
    if let Err(e) = inner.db.upload_tasks.push(&task).await {
        tracing::error!(uid = %task.uid, error = %e, "failed to re-enqueue upload task");
    }
}
