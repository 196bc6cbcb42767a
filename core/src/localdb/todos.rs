// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempo_remote::{TimeRange, TodoEvent};

use crate::Error;
use crate::localdb::opt_ts_from_ms;
use crate::localdb::tags::remove_all_by_uid;
use crate::read_through::CacheMirror;

/// Cached todo rows.
///
/// Range reads select by due time, so todos without one never show up in a
/// window query.
#[derive(Debug, Clone)]
pub struct Todos {
    pool: SqlitePool,
}

impl Todos {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, todo: &TodoEvent) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO todos (uid, summary, due_at, tag_uid, completed_at, done_id)
VALUES (?, ?, ?, ?, ?, ?)
ON CONFLICT(uid) DO UPDATE SET
    summary      = excluded.summary,
    due_at       = excluded.due_at,
    tag_uid      = excluded.tag_uid,
    completed_at = excluded.completed_at,
    done_id      = excluded.done_id;
";

        sqlx::query(SQL)
            .bind(&todo.uid)
            .bind(&todo.summary)
            .bind(todo.due_at.map(|ts| ts.as_millisecond()))
            .bind(&todo.tag_uid)
            .bind(todo.completed_at.map(|ts| ts.as_millisecond()))
            .bind(&todo.done_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, uid: &str) -> Result<Option<TodoEvent>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, summary, due_at, tag_uid, completed_at, done_id
FROM todos
WHERE uid = ?;
";

        let record: Option<TodoRecord> = sqlx::query_as(SQL)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        record.map(TodoRecord::into_todo).transpose()
    }

    pub async fn list_in_range(&self, range: TimeRange) -> Result<Vec<TodoEvent>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, summary, due_at, tag_uid, completed_at, done_id
FROM todos
WHERE due_at IS NOT NULL AND due_at >= ? AND due_at < ?
ORDER BY due_at ASC, uid ASC;
";

        let records: Vec<TodoRecord> = sqlx::query_as(SQL)
            .bind(range.start.as_millisecond())
            .bind(range.end.as_millisecond())
            .fetch_all(&self.pool)
            .await?;
        records.into_iter().map(TodoRecord::into_todo).collect()
    }

    pub async fn remove(&self, uid: &str) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM todos WHERE uid = ?;";

        sqlx::query(SQL).bind(uid).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn remove_all(&self, uids: &[String]) -> Result<(), sqlx::Error> {
        remove_all_by_uid(&self.pool, "todos", uids).await
    }

    pub async fn upsert_all(&self, todos: &[TodoEvent]) -> Result<(), sqlx::Error> {
        for todo in todos {
            self.upsert(todo).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheMirror<TodoEvent> for Todos {
    async fn upsert_all(&self, items: &[TodoEvent]) -> Result<(), Error> {
        Ok(Todos::upsert_all(self, items).await?)
    }

    async fn remove_all(&self, uids: &[String]) -> Result<(), Error> {
        Ok(Todos::remove_all(self, uids).await?)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TodoRecord {
    uid: String,
    summary: String,
    due_at: Option<i64>,
    tag_uid: Option<String>,
    completed_at: Option<i64>,
    done_id: Option<String>,
}

impl TodoRecord {
    fn into_todo(self) -> Result<TodoEvent, sqlx::Error> {
        Ok(TodoEvent {
            uid: self.uid,
            summary: self.summary,
            due_at: opt_ts_from_ms(self.due_at)?,
            tag_uid: self.tag_uid,
            completed_at: opt_ts_from_ms(self.completed_at)?,
            done_id: self.done_id,
        })
    }
}
