// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.
//!
//! This module provides helper functions to create test data including
//! configurations, entities with pinned uids, and query windows.

use std::path::Path;

use jiff::Timestamp;
use tempo_core::{Config, EventDetail, RemoteConfig, ScheduleEvent, Tag, TimeRange, TodoEvent};

/// Creates a test configuration for the given state directory.
///
/// # Arguments
///
/// * `state_dir` - Optional state directory; `None` keeps state in memory
///
/// # Example
///
/// ```ignore
/// let config = test_config(Some(state.path()));
/// ```
#[must_use]
pub fn test_config(state_dir: Option<&Path>) -> Config {
    Config {
        state_dir: state_dir.map(Path::to_path_buf),
        remote: RemoteConfig {
            // Never contacted by tests; engines built over `with_remote`
            // ignore it, and `Tempo::new` only validates it.
            base_url: "http://localhost:9".to_string(),
            ..RemoteConfig::default()
        },
    }
}

/// Parses a timestamp literal.
///
/// # Panics
///
/// Panics if the literal is not a valid RFC 3339 timestamp.
#[must_use]
pub fn ts(literal: &str) -> Timestamp {
    literal.parse().expect("invalid timestamp literal")
}

/// The query window every dated fixture falls into.
#[must_use]
pub fn test_window() -> TimeRange {
    TimeRange::new(ts("2026-03-01T00:00:00Z"), ts("2026-04-01T00:00:00Z"))
}

/// Creates a tag with a pinned uid.
#[must_use]
pub fn tag_fixture(uid: &str) -> Tag {
    Tag {
        uid: uid.to_string(),
        ..Tag::new("errands", "#3366FF")
    }
}

/// Creates an open todo with a pinned uid, due inside [`test_window`].
#[must_use]
pub fn todo_fixture(uid: &str) -> TodoEvent {
    TodoEvent {
        uid: uid.to_string(),
        ..TodoEvent::new("water the plants").with_due(ts("2026-03-10T09:00:00Z"))
    }
}

/// Creates a schedule with a pinned uid, inside [`test_window`].
#[must_use]
pub fn schedule_fixture(uid: &str) -> ScheduleEvent {
    ScheduleEvent {
        uid: uid.to_string(),
        ..ScheduleEvent::new(
            "dentist",
            ts("2026-03-12T14:00:00Z"),
            ts("2026-03-12T15:00:00Z"),
        )
    }
}

/// Creates an event detail for the given event uid.
#[must_use]
pub fn detail_fixture(uid: &str) -> EventDetail {
    EventDetail::new(uid, "bring the insurance card")
}
