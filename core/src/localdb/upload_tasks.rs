// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use sqlx::SqlitePool;

use crate::types::{EntityKind, MAX_UPLOAD_ATTEMPTS, UploadTask};

/// Durable queue of pending uploads.
///
/// Tasks drain oldest-first. A task whose fail count has reached the attempt
/// limit stays in the table as a dead letter but is never handed out again.
#[derive(Debug, Clone)]
pub struct UploadTasks {
    pool: SqlitePool,
}

impl UploadTasks {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends a task to the queue.
    pub async fn push(&self, task: &UploadTask) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO upload_tasks (timestamp, kind, uid, is_removal, fail_count)
VALUES (?, ?, ?, ?, ?);
";

        sqlx::query(SQL)
            .bind(task.timestamp)
            .bind(task.kind.as_str())
            .bind(&task.uid)
            .bind(task.is_removal)
            .bind(task.fail_count)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes and returns the oldest live task, or `None` when only dead
    /// letters remain.
    ///
    /// Tasks enqueued at the same millisecond come back in arrival order.
    pub async fn pop(&self) -> Result<Option<UploadTask>, sqlx::Error> {
        const SELECT_SQL: &str = "\
SELECT id, timestamp, kind, uid, is_removal, fail_count
FROM upload_tasks
WHERE fail_count < ?
ORDER BY timestamp ASC, id ASC
LIMIT 1;
";
        const DELETE_SQL: &str = "DELETE FROM upload_tasks WHERE id = ?;";

        let mut tx = self.pool.begin().await?;

        let row: Option<UploadTaskRow> = sqlx::query_as(SELECT_SQL)
            .bind(MAX_UPLOAD_ATTEMPTS)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query(DELETE_SQL).bind(row.id).execute(&mut *tx).await?;
        tx.commit().await?;

        row.into_task().map(Some)
    }

    /// Lists queued tasks oldest-first, optionally including dead letters.
    pub async fn scan_all(&self, include_dead: bool) -> Result<Vec<UploadTask>, sqlx::Error> {
        const ALL_SQL: &str = "\
SELECT id, timestamp, kind, uid, is_removal, fail_count
FROM upload_tasks
ORDER BY timestamp ASC, id ASC;
";
        const LIVE_SQL: &str = "\
SELECT id, timestamp, kind, uid, is_removal, fail_count
FROM upload_tasks
WHERE fail_count < ?
ORDER BY timestamp ASC, id ASC;
";

        let rows: Vec<UploadTaskRow> = if include_dead {
            sqlx::query_as(ALL_SQL).fetch_all(&self.pool).await?
        } else {
            sqlx::query_as(LIVE_SQL)
                .bind(MAX_UPLOAD_ATTEMPTS)
                .fetch_all(&self.pool)
                .await?
        };
        rows.into_iter().map(UploadTaskRow::into_task).collect()
    }

    /// Number of queued tasks, optionally including dead letters.
    pub async fn count(&self, include_dead: bool) -> Result<i64, sqlx::Error> {
        const ALL_SQL: &str = "SELECT COUNT(*) FROM upload_tasks;";
        const LIVE_SQL: &str = "SELECT COUNT(*) FROM upload_tasks WHERE fail_count < ?;";

        let (count,): (i64,) = if include_dead {
            sqlx::query_as(ALL_SQL).fetch_one(&self.pool).await?
        } else {
            sqlx::query_as(LIVE_SQL)
                .bind(MAX_UPLOAD_ATTEMPTS)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(count)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct UploadTaskRow {
    id: i64,
    timestamp: i64,
    kind: String,
    uid: String,
    is_removal: bool,
    fail_count: u32,
}

impl UploadTaskRow {
    fn into_task(self) -> Result<UploadTask, sqlx::Error> {
        let kind = EntityKind::from_str(&self.kind).map_err(|()| {
            sqlx::Error::Decode(format!("unknown entity kind: {}", self.kind).into())
        })?;
        Ok(UploadTask {
            timestamp: self.timestamp,
            kind,
            uid: self.uid,
            is_removal: self.is_removal,
            fail_count: self.fail_count,
        })
    }
}
