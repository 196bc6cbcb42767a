// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use tempo_remote::{Client, EventDetail, ScheduleEvent, Tag, TimeRange, TodoEvent};
use tokio::fs;

use crate::dispatch::{Dispatcher, RemoteApi};
use crate::localdb::LocalDb;
use crate::read_through::load_cache_then_remote;
use crate::toggle::ToggleGuard;
use crate::types::{EntityKind, UploadTask};
use crate::uploader::Uploader;
use crate::{Config, Error, ToggleResult};

/// Tempo synchronization engine.
///
/// Writes land in the local database immediately and are queued for upload;
/// reads serve the local cache first and refresh from the sync service.
/// Cloning is cheap, and clones share the same database and upload worker.
#[derive(Debug, Clone)]
pub struct Tempo {
    db: LocalDb,
    remote: Arc<dyn RemoteApi>,
    uploader: Uploader,
    toggles: ToggleGuard,
}

impl Tempo {
    /// Creates an engine with the given configuration.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let client = Client::new(config.remote.clone())?;
        Self::with_remote(config, Arc::new(client)).await
    }

    /// Creates an engine that talks to a custom sync service implementation.
    pub async fn with_remote(
        mut config: Config,
        remote: Arc<dyn RemoteApi>,
    ) -> Result<Self, Error> {
        config.normalize()?;
        prepare(&config).await?;

        let db = LocalDb::open(config.state_dir.as_deref()).await?;
        let dispatcher = Dispatcher::new(remote.clone(), db.clone());
        let uploader = Uploader::new(db.clone(), dispatcher);
        let toggles = ToggleGuard::new(remote.clone(), db.clone());
        Ok(Self {
            db,
            remote,
            uploader,
            toggles,
        })
    }

    /// Streams all tags: the cached snapshot first, then the refreshed list.
    pub fn list_tags(&self) -> BoxStream<'static, Result<Vec<Tag>, Error>> {
        let cache = {
            let tags = self.db.tags.clone();
            async move { tags.list_all().await.map(Some) }
        };
        let refresh = {
            let remote = self.remote.clone();
            async move { Ok(remote.list_tags().await?) }
        };
        load_cache_then_remote(self.db.tags.clone(), cache, refresh).boxed()
    }

    /// Streams todos due inside `range`: the cached snapshot first, then the
    /// refreshed list.
    pub fn list_todos(
        &self,
        range: TimeRange,
    ) -> BoxStream<'static, Result<Vec<TodoEvent>, Error>> {
        let cache = {
            let todos = self.db.todos.clone();
            async move { todos.list_in_range(range).await.map(Some) }
        };
        let refresh = {
            let remote = self.remote.clone();
            async move { Ok(remote.list_todos(range).await?) }
        };
        load_cache_then_remote(self.db.todos.clone(), cache, refresh).boxed()
    }

    /// Streams schedules overlapping `range`: the cached snapshot first, then
    /// the refreshed list.
    pub fn list_schedules(
        &self,
        range: TimeRange,
    ) -> BoxStream<'static, Result<Vec<ScheduleEvent>, Error>> {
        let cache = {
            let schedules = self.db.schedules.clone();
            async move { schedules.list_in_range(range).await.map(Some) }
        };
        let refresh = {
            let remote = self.remote.clone();
            async move { Ok(remote.list_schedules(range).await?) }
        };
        load_cache_then_remote(self.db.schedules.clone(), cache, refresh).boxed()
    }

    /// Streams the detail attached to an event, cached copy first. Yields
    /// `None` when the event has no detail.
    pub fn load_event_detail(
        &self,
        uid: impl Into<String>,
    ) -> BoxStream<'static, Result<Option<EventDetail>, Error>> {
        let uid = uid.into();
        let cache = {
            let details = self.db.event_details.clone();
            let uid = uid.clone();
            async move { details.get(&uid).await.map(|row| row.map(|d| vec![d])) }
        };
        let refresh = {
            let remote = self.remote.clone();
            async move {
                let detail = remote.get_event_detail(&uid).await?;
                // An absent detail refreshes as an empty batch, clearing any
                // stale cached copy.
                Ok(detail.into_iter().collect())
            }
        };
        load_cache_then_remote(self.db.event_details.clone(), cache, refresh)
            .map(|result| result.map(|batch| batch.into_iter().next()))
            .boxed()
    }

    /// Saves a tag locally and queues it for upload.
    pub async fn save_tag(&self, tag: &Tag) -> Result<(), Error> {
        self.db.tags.upsert(tag).await?;
        self.uploader
            .append(&UploadTask::upsert(EntityKind::Tag, &tag.uid))
            .await
    }

    /// Deletes a tag locally and queues the deletion for upload.
    pub async fn delete_tag(&self, uid: &str) -> Result<(), Error> {
        self.db.tags.remove(uid).await?;
        self.uploader
            .append(&UploadTask::removal(EntityKind::Tag, uid))
            .await
    }

    /// Saves a todo locally and queues it for upload.
    pub async fn save_todo(&self, todo: &TodoEvent) -> Result<(), Error> {
        self.db.todos.upsert(todo).await?;
        self.uploader
            .append(&UploadTask::upsert(EntityKind::Todo, &todo.uid))
            .await
    }

    /// Deletes a todo locally and queues the deletion for upload.
    pub async fn delete_todo(&self, uid: &str) -> Result<(), Error> {
        self.db.todos.remove(uid).await?;
        self.uploader
            .append(&UploadTask::removal(EntityKind::Todo, uid))
            .await
    }

    /// Saves a schedule locally and queues it for upload.
    pub async fn save_schedule(&self, schedule: &ScheduleEvent) -> Result<(), Error> {
        self.db.schedules.upsert(schedule).await?;
        self.uploader
            .append(&UploadTask::upsert(EntityKind::Schedule, &schedule.uid))
            .await
    }

    /// Deletes a schedule locally and queues the deletion for upload.
    pub async fn delete_schedule(&self, uid: &str) -> Result<(), Error> {
        self.db.schedules.remove(uid).await?;
        self.uploader
            .append(&UploadTask::removal(EntityKind::Schedule, uid))
            .await
    }

    /// Saves an event detail locally and queues it for upload.
    pub async fn save_event_detail(&self, detail: &EventDetail) -> Result<(), Error> {
        self.db.event_details.upsert(detail).await?;
        self.uploader
            .append(&UploadTask::upsert(EntityKind::EventDetail, &detail.uid))
            .await
    }

    /// Deletes an event detail locally and queues the deletion for upload.
    pub async fn delete_event_detail(&self, uid: &str) -> Result<(), Error> {
        self.db.event_details.remove(uid).await?;
        self.uploader
            .append(&UploadTask::removal(EntityKind::EventDetail, uid))
            .await
    }

    /// Toggles a todo's completion state against the sync service.
    ///
    /// Returns `None` when the call only flagged an in-flight completion for
    /// reversal, or when a revert was already in flight.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_todo(&self, uid: &str) -> Result<Option<ToggleResult>, Error> {
        self.toggles.toggle(uid).await
    }

    /// Starts draining the pending upload queue, unless already draining.
    pub fn resume_uploading(&self) {
        self.uploader.resume();
    }

    /// Stops the upload worker after the in-flight task.
    pub fn pause_uploading(&self) {
        self.uploader.pause();
    }

    /// Waits until the upload worker has stopped.
    pub async fn wait_until_uploading_end(&self) {
        self.uploader.wait_until_idle().await;
    }

    /// Lists queued uploads oldest-first, optionally including dead letters.
    pub async fn pending_uploads(&self, include_dead: bool) -> Result<Vec<UploadTask>, Error> {
        Ok(self.db.upload_tasks.scan_all(include_dead).await?)
    }

    /// Number of queued uploads, optionally including dead letters.
    pub async fn pending_upload_count(&self, include_dead: bool) -> Result<i64, Error> {
        Ok(self.db.upload_tasks.count(include_dead).await?)
    }

    /// Enqueues an upload task directly.
    pub async fn append_upload(&self, task: &UploadTask) -> Result<(), Error> {
        self.uploader.append(task).await
    }

    /// Enqueues several upload tasks directly.
    pub async fn append_uploads(&self, tasks: &[UploadTask]) -> Result<(), Error> {
        self.uploader.append_all(tasks).await
    }

    /// Shuts the engine down: stops the upload worker, then closes the
    /// database. Unfinished uploads stay queued for the next session.
    pub async fn close(self) -> Result<(), Error> {
        self.uploader.pause();
        self.uploader.wait_until_idle().await;
        self.db.close().await
    }
}

async fn prepare(config: &Config) -> Result<(), Error> {
    if let Some(dir) = &config.state_dir {
        tracing::debug!(path = %dir.display(), "ensuring state directory exists");
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}
