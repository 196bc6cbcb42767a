// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempo_remote::EventDetail;

use crate::Error;
use crate::localdb::tags::remove_all_by_uid;
use crate::read_through::CacheMirror;

/// Cached per-event detail rows, keyed by the owning event's uid.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pool: SqlitePool,
}

impl EventDetails {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, detail: &EventDetail) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO event_details (uid, memo, url)
VALUES (?, ?, ?)
ON CONFLICT(uid) DO UPDATE SET
    memo = excluded.memo,
    url  = excluded.url;
";

        sqlx::query(SQL)
            .bind(&detail.uid)
            .bind(&detail.memo)
            .bind(&detail.url)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, uid: &str) -> Result<Option<EventDetail>, sqlx::Error> {
        const SQL: &str = "SELECT uid, memo, url FROM event_details WHERE uid = ?;";

        let record: Option<EventDetailRecord> = sqlx::query_as(SQL)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record.map(EventDetailRecord::into_detail))
    }

    pub async fn remove(&self, uid: &str) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM event_details WHERE uid = ?;";

        sqlx::query(SQL).bind(uid).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn remove_all(&self, uids: &[String]) -> Result<(), sqlx::Error> {
        remove_all_by_uid(&self.pool, "event_details", uids).await
    }

    pub async fn upsert_all(&self, details: &[EventDetail]) -> Result<(), sqlx::Error> {
        for detail in details {
            self.upsert(detail).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheMirror<EventDetail> for EventDetails {
    async fn upsert_all(&self, items: &[EventDetail]) -> Result<(), Error> {
        Ok(EventDetails::upsert_all(self, items).await?)
    }

    async fn remove_all(&self, uids: &[String]) -> Result<(), Error> {
        Ok(EventDetails::remove_all(self, uids).await?)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct EventDetailRecord {
    uid: String,
    memo: String,
    url: Option<String>,
}

impl EventDetailRecord {
    fn into_detail(self) -> EventDetail {
        EventDetail {
            uid: self.uid,
            memo: self.memo,
            url: self.url,
        }
    }
}
