// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-through reads.
//!
//! A read yields the locally cached snapshot first, then refreshes from the
//! sync service and yields the result. Cache trouble downgrades to a miss;
//! only the remote refresh can fail the stream.

use std::collections::HashSet;
use std::future::Future;

use async_trait::async_trait;
use futures::Stream;
use tempo_remote::{EventDetail, ScheduleEvent, Tag, TodoEvent};

use crate::Error;

/// Anything addressable by uid.
pub(crate) trait Keyed {
    fn uid(&self) -> &str;
}

impl Keyed for Tag {
    fn uid(&self) -> &str {
        &self.uid
    }
}

impl Keyed for TodoEvent {
    fn uid(&self) -> &str {
        &self.uid
    }
}

impl Keyed for ScheduleEvent {
    fn uid(&self) -> &str {
        &self.uid
    }
}

impl Keyed for EventDetail {
    fn uid(&self) -> &str {
        &self.uid
    }
}

/// Write-side of a local cache table, used to fold refreshed rows back in.
#[async_trait]
pub(crate) trait CacheMirror<T>: Send + Sync {
    async fn upsert_all(&self, items: &[T]) -> Result<(), Error>;

    async fn remove_all(&self, uids: &[String]) -> Result<(), Error>;
}

/// Streams the cached snapshot (when one exists), then the refreshed rows.
///
/// The stream yields at most twice and always ends after the remote refresh
/// resolves: either with the refreshed rows or with the remote error. A
/// failing cache read logs and degrades to a miss. Mirroring refreshed rows
/// back into the cache is best effort.
pub(crate) fn load_cache_then_remote<T, M, C, R>(
    mirror: M,
    cache: C,
    remote: R,
) -> impl Stream<Item = Result<Vec<T>, Error>>
where
    T: Keyed + Clone + Send + Sync + 'static,
    M: CacheMirror<T>,
    C: Future<Output = Result<Option<Vec<T>>, sqlx::Error>>,
    R: Future<Output = Result<Vec<T>, Error>>,
{
    async_stream::stream! {
        let cached = match cache.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(error = %e, "cache read failed, treating as miss");
                None
            }
        };
        if let Some(rows) = &cached {
            yield Ok(rows.clone());
        }

        match remote.await {
            Ok(refreshed) => {
                let stale = cached.as_deref().unwrap_or_default();
                if let Err(e) = reconcile(&mirror, stale, &refreshed).await {
                    tracing::warn!(error = %e, "failed to fold refreshed rows into cache");
                }
                yield Ok(refreshed);
            }
            Err(e) => yield Err(e),
        }
    }
}

/// Replaces the cached snapshot with the refreshed rows: uids that vanished
/// remotely are deleted, everything else is upserted.
async fn reconcile<T, M>(mirror: &M, cached: &[T], refreshed: &[T]) -> Result<(), Error>
where
    T: Keyed,
    M: CacheMirror<T>,
{
    let fresh: HashSet<&str> = refreshed.iter().map(Keyed::uid).collect();
    let stale: Vec<String> = cached
        .iter()
        .map(Keyed::uid)
        .filter(|uid| !fresh.contains(uid))
        .map(str::to_string)
        .collect();

    if !stale.is_empty() {
        mirror.remove_all(&stale).await?;
    }
    mirror.upsert_all(refreshed).await
}
