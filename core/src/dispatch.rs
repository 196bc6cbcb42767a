// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Delivery of queued uploads to the sync service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tempo_remote::{
    Client, DoneTodo, EventDetail, RemoteError, ScheduleEvent, Tag, TimeRange, TodoEvent,
};

use crate::Error;
use crate::localdb::LocalDb;
use crate::types::{EntityKind, UploadTask};

/// The sync service surface the engine talks to.
///
/// [`Client`] is the production implementation. Embedders can substitute
/// their own transport, and tests do.
#[async_trait]
pub trait RemoteApi: fmt::Debug + Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError>;

    async fn put_tag(&self, tag: &Tag) -> Result<Tag, RemoteError>;

    async fn delete_tag(&self, uid: &str) -> Result<(), RemoteError>;

    async fn list_todos(&self, range: TimeRange) -> Result<Vec<TodoEvent>, RemoteError>;

    async fn put_todo(&self, todo: &TodoEvent) -> Result<TodoEvent, RemoteError>;

    async fn delete_todo(&self, uid: &str) -> Result<(), RemoteError>;

    async fn complete_todo(&self, todo: &TodoEvent) -> Result<DoneTodo, RemoteError>;

    async fn revert_todo(&self, uid: &str, done_id: Option<&str>)
    -> Result<TodoEvent, RemoteError>;

    async fn list_schedules(&self, range: TimeRange) -> Result<Vec<ScheduleEvent>, RemoteError>;

    async fn put_schedule(&self, schedule: &ScheduleEvent) -> Result<ScheduleEvent, RemoteError>;

    async fn delete_schedule(&self, uid: &str) -> Result<(), RemoteError>;

    async fn get_event_detail(&self, uid: &str) -> Result<Option<EventDetail>, RemoteError>;

    async fn put_event_detail(&self, detail: &EventDetail) -> Result<EventDetail, RemoteError>;

    async fn delete_event_detail(&self, uid: &str) -> Result<(), RemoteError>;
}

#[async_trait]
impl RemoteApi for Client {
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        Client::list_tags(self).await
    }

    async fn put_tag(&self, tag: &Tag) -> Result<Tag, RemoteError> {
        Client::put_tag(self, tag).await
    }

    async fn delete_tag(&self, uid: &str) -> Result<(), RemoteError> {
        Client::delete_tag(self, uid).await
    }

    async fn list_todos(&self, range: TimeRange) -> Result<Vec<TodoEvent>, RemoteError> {
        Client::list_todos(self, range).await
    }

    async fn put_todo(&self, todo: &TodoEvent) -> Result<TodoEvent, RemoteError> {
        Client::put_todo(self, todo).await
    }

    async fn delete_todo(&self, uid: &str) -> Result<(), RemoteError> {
        Client::delete_todo(self, uid).await
    }

    async fn complete_todo(&self, todo: &TodoEvent) -> Result<DoneTodo, RemoteError> {
        Client::complete_todo(self, todo).await
    }

    async fn revert_todo(
        &self,
        uid: &str,
        done_id: Option<&str>,
    ) -> Result<TodoEvent, RemoteError> {
        Client::revert_todo(self, uid, done_id).await
    }

    async fn list_schedules(&self, range: TimeRange) -> Result<Vec<ScheduleEvent>, RemoteError> {
        Client::list_schedules(self, range).await
    }

    async fn put_schedule(&self, schedule: &ScheduleEvent) -> Result<ScheduleEvent, RemoteError> {
        Client::put_schedule(self, schedule).await
    }

    async fn delete_schedule(&self, uid: &str) -> Result<(), RemoteError> {
        Client::delete_schedule(self, uid).await
    }

    async fn get_event_detail(&self, uid: &str) -> Result<Option<EventDetail>, RemoteError> {
        Client::get_event_detail(self, uid).await
    }

    async fn put_event_detail(&self, detail: &EventDetail) -> Result<EventDetail, RemoteError> {
        Client::put_event_detail(self, detail).await
    }

    async fn delete_event_detail(&self, uid: &str) -> Result<(), RemoteError> {
        Client::delete_event_detail(self, uid).await
    }
}

/// Plays a single queued task against the sync service.
///
/// Tasks carry only a uid, so upserts read the entity's latest state from the
/// local database right before sending. A row that vanished locally in the
/// meantime makes the task a no-op.
#[derive(Debug, Clone)]
pub(crate) struct Dispatcher {
    remote: Arc<dyn RemoteApi>,
    db: LocalDb,
}

impl Dispatcher {
    pub fn new(remote: Arc<dyn RemoteApi>, db: LocalDb) -> Self {
        Self { remote, db }
    }

    pub async fn dispatch(&self, task: &UploadTask) -> Result<(), Error> {
        match (task.kind, task.is_removal) {
            (EntityKind::Tag, false) => self.push_tag(&task.uid).await,
            (EntityKind::Tag, true) => already_gone_ok(self.remote.delete_tag(&task.uid).await),
            (EntityKind::Todo, false) => self.push_todo(&task.uid).await,
            (EntityKind::Todo, true) => already_gone_ok(self.remote.delete_todo(&task.uid).await),
            (EntityKind::Schedule, false) => self.push_schedule(&task.uid).await,
            (EntityKind::Schedule, true) => {
                already_gone_ok(self.remote.delete_schedule(&task.uid).await)
            }
            (EntityKind::EventDetail, false) => self.push_event_detail(&task.uid).await,
            (EntityKind::EventDetail, true) => {
                already_gone_ok(self.remote.delete_event_detail(&task.uid).await)
            }
        }
    }

    async fn push_tag(&self, uid: &str) -> Result<(), Error> {
        let Some(tag) = self.db.tags.get(uid).await? else {
            tracing::debug!(uid, "tag vanished locally, nothing to upload");
            return Ok(());
        };
        let canonical = self.remote.put_tag(&tag).await?;
        if let Err(e) = self.db.tags.upsert(&canonical).await {
            tracing::warn!(uid, error = %e, "failed to mirror uploaded tag");
        }
        Ok(())
    }

    async fn push_todo(&self, uid: &str) -> Result<(), Error> {
        let Some(todo) = self.db.todos.get(uid).await? else {
            tracing::debug!(uid, "todo vanished locally, nothing to upload");
            return Ok(());
        };
        let canonical = self.remote.put_todo(&todo).await?;
        if let Err(e) = self.db.todos.upsert(&canonical).await {
            tracing::warn!(uid, error = %e, "failed to mirror uploaded todo");
        }
        Ok(())
    }

    async fn push_schedule(&self, uid: &str) -> Result<(), Error> {
        let Some(schedule) = self.db.schedules.get(uid).await? else {
            tracing::debug!(uid, "schedule vanished locally, nothing to upload");
            return Ok(());
        };
        let canonical = self.remote.put_schedule(&schedule).await?;
        if let Err(e) = self.db.schedules.upsert(&canonical).await {
            tracing::warn!(uid, error = %e, "failed to mirror uploaded schedule");
        }
        Ok(())
    }

    async fn push_event_detail(&self, uid: &str) -> Result<(), Error> {
        let Some(detail) = self.db.event_details.get(uid).await? else {
            tracing::debug!(uid, "event detail vanished locally, nothing to upload");
            return Ok(());
        };
        let canonical = self.remote.put_event_detail(&detail).await?;
        if let Err(e) = self.db.event_details.upsert(&canonical).await {
            tracing::warn!(uid, error = %e, "failed to mirror uploaded event detail");
        }
        Ok(())
    }
}

/// Deleting something the sync service has never seen, or has already
/// deleted, counts as success.
fn already_gone_ok(result: Result<(), RemoteError>) -> Result<(), Error> {
    match result {
        Ok(()) | Err(RemoteError::NotFound(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
