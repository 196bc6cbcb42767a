// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use futures::StreamExt;
use futures::stream::BoxStream;
use tempo_core::{Error, UploadTask};

/// Collects every emission of a read stream, in order.
pub async fn collect_emissions<T>(
    stream: BoxStream<'static, Result<T, Error>>,
) -> Vec<Result<T, Error>> {
    stream.collect().await
}

/// Asserts that the queued tasks carry exactly the given uids, in order.
///
/// # Panics
///
/// Panics if the uids differ.
pub fn assert_task_uids(tasks: &[UploadTask], expected: &[&str]) {
    let uids: Vec<_> = tasks.iter().map(|task| task.uid.as_str()).collect();
    assert_eq!(uids, expected, "queued tasks should match");
}
