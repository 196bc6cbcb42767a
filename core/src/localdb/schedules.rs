// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempo_remote::{ScheduleEvent, TimeRange};

use crate::Error;
use crate::localdb::tags::remove_all_by_uid;
use crate::localdb::ts_from_ms;
use crate::read_through::CacheMirror;

/// Cached schedule rows.
#[derive(Debug, Clone)]
pub struct Schedules {
    pool: SqlitePool,
}

impl Schedules {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, schedule: &ScheduleEvent) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO schedules (uid, summary, starts_at, ends_at, tag_uid, place)
VALUES (?, ?, ?, ?, ?, ?)
ON CONFLICT(uid) DO UPDATE SET
    summary   = excluded.summary,
    starts_at = excluded.starts_at,
    ends_at   = excluded.ends_at,
    tag_uid   = excluded.tag_uid,
    place     = excluded.place;
";

        sqlx::query(SQL)
            .bind(&schedule.uid)
            .bind(&schedule.summary)
            .bind(schedule.starts_at.as_millisecond())
            .bind(schedule.ends_at.as_millisecond())
            .bind(&schedule.tag_uid)
            .bind(&schedule.place)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, uid: &str) -> Result<Option<ScheduleEvent>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, summary, starts_at, ends_at, tag_uid, place
FROM schedules
WHERE uid = ?;
";

        let record: Option<ScheduleRecord> = sqlx::query_as(SQL)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        record.map(ScheduleRecord::into_schedule).transpose()
    }

    /// Lists schedules overlapping `range`, ordered by start time.
    pub async fn list_in_range(&self, range: TimeRange) -> Result<Vec<ScheduleEvent>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, summary, starts_at, ends_at, tag_uid, place
FROM schedules
WHERE starts_at < ? AND ends_at > ?
ORDER BY starts_at ASC, uid ASC;
";

        let records: Vec<ScheduleRecord> = sqlx::query_as(SQL)
            .bind(range.end.as_millisecond())
            .bind(range.start.as_millisecond())
            .fetch_all(&self.pool)
            .await?;
        records
            .into_iter()
            .map(ScheduleRecord::into_schedule)
            .collect()
    }

    pub async fn remove(&self, uid: &str) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM schedules WHERE uid = ?;";

        sqlx::query(SQL).bind(uid).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn remove_all(&self, uids: &[String]) -> Result<(), sqlx::Error> {
        remove_all_by_uid(&self.pool, "schedules", uids).await
    }

    pub async fn upsert_all(&self, schedules: &[ScheduleEvent]) -> Result<(), sqlx::Error> {
        for schedule in schedules {
            self.upsert(schedule).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheMirror<ScheduleEvent> for Schedules {
    async fn upsert_all(&self, items: &[ScheduleEvent]) -> Result<(), Error> {
        Ok(Schedules::upsert_all(self, items).await?)
    }

    async fn remove_all(&self, uids: &[String]) -> Result<(), Error> {
        Ok(Schedules::remove_all(self, uids).await?)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ScheduleRecord {
    uid: String,
    summary: String,
    starts_at: i64,
    ends_at: i64,
    tag_uid: Option<String>,
    place: Option<String>,
}

impl ScheduleRecord {
    fn into_schedule(self) -> Result<ScheduleEvent, sqlx::Error> {
        Ok(ScheduleEvent {
            uid: self.uid,
            summary: self.summary,
            starts_at: ts_from_ms(self.starts_at)?,
            ends_at: ts_from_ms(self.ends_at)?,
            tag_uid: self.tag_uid,
            place: self.place,
        })
    }
}
