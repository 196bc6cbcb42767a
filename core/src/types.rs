// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use jiff::Timestamp;

/// Number of delivery attempts before a task is dead-lettered.
pub const MAX_UPLOAD_ATTEMPTS: u32 = 3;

const KIND_TAG: &str = "tag";
const KIND_TODO: &str = "todo";
const KIND_SCHEDULE: &str = "schedule";
const KIND_EVENT_DETAIL: &str = "event_detail";

/// Kind of entity a pending upload refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A user-defined label.
    Tag,

    /// A todo item.
    Todo,

    /// A calendar event occupying a time range.
    Schedule,

    /// Free-form detail attached to an event.
    EventDetail,
}

impl EntityKind {
    /// String form stored in the pending queue.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Tag => KIND_TAG,
            EntityKind::Todo => KIND_TODO,
            EntityKind::Schedule => KIND_SCHEDULE,
            EntityKind::EventDetail => KIND_EVENT_DETAIL,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            KIND_TAG => Ok(EntityKind::Tag),
            KIND_TODO => Ok(EntityKind::Todo),
            KIND_SCHEDULE => Ok(EntityKind::Schedule),
            KIND_EVENT_DETAIL => Ok(EntityKind::EventDetail),
            _ => Err(()),
        }
    }
}

/// A pending change to be pushed to the sync service.
///
/// Tasks carry no payload. The uid is looked up in the local database at
/// dispatch time, so a task always uploads the entity's latest state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    /// Enqueue time in milliseconds since the Unix epoch. Drain order.
    pub timestamp: i64,

    /// Kind of entity the task refers to.
    pub kind: EntityKind,

    /// Uid of the entity the task refers to.
    pub uid: String,

    /// Whether this task deletes the entity instead of upserting it.
    pub is_removal: bool,

    /// Number of failed delivery attempts so far.
    pub fail_count: u32,
}

impl UploadTask {
    /// Creates a task that uploads the entity's current state.
    #[must_use]
    pub fn upsert(kind: EntityKind, uid: impl Into<String>) -> Self {
        Self {
            timestamp: now_ms(),
            kind,
            uid: uid.into(),
            is_removal: false,
            fail_count: 0,
        }
    }

    /// Creates a task that deletes the entity from the sync service.
    #[must_use]
    pub fn removal(kind: EntityKind, uid: impl Into<String>) -> Self {
        Self {
            timestamp: now_ms(),
            kind,
            uid: uid.into(),
            is_removal: true,
            fail_count: 0,
        }
    }

    /// Whether the task has exhausted its delivery attempts.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.fail_count >= MAX_UPLOAD_ATTEMPTS
    }
}

pub(crate) fn now_ms() -> i64 {
    Timestamp::now().as_millisecond()
}
