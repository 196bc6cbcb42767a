// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

mod event_details;
mod schedules;
mod tags;
mod todos;
mod upload_tasks;


use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use jiff::Timestamp;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::Error;
use crate::localdb::event_details::EventDetails;
use crate::localdb::schedules::Schedules;
use crate::localdb::tags::Tags;
use crate::localdb::todos::Todos;
use crate::localdb::upload_tasks::UploadTasks;

const DB_NAME: &str = "tempo.db";

/// Distinguishes concurrently opened in-memory databases from each other.
pub(crate) static IN_MEMORY_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub tags: Tags,
    pub todos: Todos,
    pub schedules: Schedules,
    pub event_details: EventDetails,
    pub upload_tasks: UploadTasks,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `state_dir` is `None`, it opens an in-memory database.
    pub async fn open(state_dir: Option<&Path>) -> Result<Self, Error> {
        let mut pool_options = SqlitePoolOptions::new();
        let options = if let Some(dir) = state_dir {
            tracing::info!(dir = %dir.display(), "connecting to SQLite database");
            let dir = dir
                .to_str()
                .ok_or_else(|| Error::Config("Invalid path encoding".into()))?;
            SqliteConnectOptions::new()
                .filename(format!("{dir}/{DB_NAME}"))
                .create_if_missing(true)
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // A shared-cache memory database only lives while some connection
            // holds it open, so the pool must never drain completely.
            let db_id = IN_MEMORY_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            SqliteConnectOptions::new()
                .filename(format!("file:memdb_{db_id}?mode=memory&cache=shared"))
                .in_memory(true)
                .create_if_missing(true)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("src/localdb/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        let tags = Tags::new(pool.clone());
        let todos = Todos::new(pool.clone());
        let schedules = Schedules::new(pool.clone());
        let event_details = EventDetails::new(pool.clone());
        let upload_tasks = UploadTasks::new(pool.clone());
        Ok(LocalDb {
            pool,
            tags,
            todos,
            schedules,
            event_details,
            upload_tasks,
        })
    }

    pub async fn close(self) -> Result<(), Error> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }
}

pub(crate) fn opt_ts_from_ms(ms: Option<i64>) -> Result<Option<Timestamp>, sqlx::Error> {
    ms.map(ts_from_ms).transpose()
}

pub(crate) fn ts_from_ms(ms: i64) -> Result<Timestamp, sqlx::Error> {
    Timestamp::from_millisecond(ms)
        .map_err(|e| sqlx::Error::Decode(format!("invalid timestamp {ms}: {e}").into()))
}
