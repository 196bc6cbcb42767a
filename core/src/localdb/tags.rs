// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempo_remote::Tag;

use crate::Error;
use crate::read_through::CacheMirror;

#[derive(Debug, Clone)]
pub struct Tags {
    pool: SqlitePool,
}

impl Tags {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, tag: &Tag) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO tags (uid, name, color)
VALUES (?, ?, ?)
ON CONFLICT(uid) DO UPDATE SET
    name  = excluded.name,
    color = excluded.color;
";

        sqlx::query(SQL)
            .bind(&tag.uid)
            .bind(&tag.name)
            .bind(&tag.color)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, uid: &str) -> Result<Option<Tag>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, name, color
FROM tags
WHERE uid = ?;
";

        let record: Option<TagRecord> = sqlx::query_as(SQL)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record.map(TagRecord::into_tag))
    }

    pub async fn list_all(&self) -> Result<Vec<Tag>, sqlx::Error> {
        const SQL: &str = "\
SELECT uid, name, color
FROM tags
ORDER BY name ASC, uid ASC;
";

        let records: Vec<TagRecord> = sqlx::query_as(SQL).fetch_all(&self.pool).await?;
        Ok(records.into_iter().map(TagRecord::into_tag).collect())
    }

    pub async fn remove(&self, uid: &str) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM tags WHERE uid = ?;";

        sqlx::query(SQL).bind(uid).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn remove_all(&self, uids: &[String]) -> Result<(), sqlx::Error> {
        remove_all_by_uid(&self.pool, "tags", uids).await
    }

    pub async fn upsert_all(&self, tags: &[Tag]) -> Result<(), sqlx::Error> {
        for tag in tags {
            self.upsert(tag).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheMirror<Tag> for Tags {
    async fn upsert_all(&self, items: &[Tag]) -> Result<(), Error> {
        Ok(Tags::upsert_all(self, items).await?)
    }

    async fn remove_all(&self, uids: &[String]) -> Result<(), Error> {
        Ok(Tags::remove_all(self, uids).await?)
    }
}

/// Deletes rows by uid with a dynamically sized `IN` clause.
pub(super) async fn remove_all_by_uid(
    pool: &SqlitePool,
    table: &str,
    uids: &[String],
) -> Result<(), sqlx::Error> {
    if uids.is_empty() {
        return Ok(());
    }

    let placeholders = vec!["?"; uids.len()].join(", ");
    let sql = format!("DELETE FROM {table} WHERE uid IN ({placeholders});");

    let mut query = sqlx::query(&sql);
    for uid in uids {
        query = query.bind(uid);
    }
    query.execute(pool).await?;

    Ok(())
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TagRecord {
    uid: String,
    name: String,
    color: String,
}

impl TagRecord {
    fn into_tag(self) -> Tag {
        Tag {
            uid: self.uid,
            name: self.name,
            color: self.color,
        }
    }
}
