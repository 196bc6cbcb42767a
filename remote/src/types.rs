// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined label with a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Display color, e.g. `#ff8800`.
    pub color: String,
}

impl Tag {
    /// Creates a tag with a freshly minted uid.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A todo item. Completion is reflected by `completed_at`/`done_id`; the
/// server mints `done_id` when it records a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoEvent {
    /// Unique identifier.
    pub uid: String,
    /// Short human-readable description.
    pub summary: String,
    /// When the todo is due, if scheduled.
    #[serde(default)]
    pub due_at: Option<Timestamp>,
    /// Owning tag, if any.
    #[serde(default)]
    pub tag_uid: Option<String>,
    /// When the todo was completed, if it was.
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    /// Server-side identifier of the completion record.
    #[serde(default)]
    pub done_id: Option<String>,
}

impl TodoEvent {
    /// Creates an open todo with a freshly minted uid.
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            summary: summary.into(),
            due_at: None,
            tag_uid: None,
            completed_at: None,
            done_id: None,
        }
    }

    /// Sets the due time.
    #[must_use]
    pub fn with_due(mut self, due_at: Timestamp) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the owning tag.
    #[must_use]
    pub fn with_tag(mut self, tag_uid: impl Into<String>) -> Self {
        self.tag_uid = Some(tag_uid.into());
        self
    }

    /// Whether a completion has been recorded for this todo.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done_id.is_some()
    }
}

/// A calendar event occupying a time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Unique identifier.
    pub uid: String,
    /// Short human-readable description.
    pub summary: String,
    /// Start of the occupied range.
    pub starts_at: Timestamp,
    /// End of the occupied range.
    pub ends_at: Timestamp,
    /// Owning tag, if any.
    #[serde(default)]
    pub tag_uid: Option<String>,
    /// Free-form location.
    #[serde(default)]
    pub place: Option<String>,
}

impl ScheduleEvent {
    /// Creates a schedule event with a freshly minted uid.
    #[must_use]
    pub fn new(summary: impl Into<String>, starts_at: Timestamp, ends_at: Timestamp) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            summary: summary.into(),
            starts_at,
            ends_at,
            tag_uid: None,
            place: None,
        }
    }

    /// Sets the owning tag.
    #[must_use]
    pub fn with_tag(mut self, tag_uid: impl Into<String>) -> Self {
        self.tag_uid = Some(tag_uid.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }
}

/// Free-form detail attached to an event, keyed by the event's uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    /// Uid of the event this detail belongs to.
    pub uid: String,
    /// Free-form memo text.
    pub memo: String,
    /// Attached link, if any.
    #[serde(default)]
    pub url: Option<String>,
}

impl EventDetail {
    /// Creates a detail record for the given event uid.
    #[must_use]
    pub fn new(uid: impl Into<String>, memo: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            memo: memo.into(),
            url: None,
        }
    }

    /// Sets the attached link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Server response to a todo completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneTodo {
    /// Identifier of the completion record, needed to revert it.
    pub done_id: String,
    /// The todo as the server now sees it.
    pub todo: TodoEvent,
}

/// Half-open query window `[start, end)` used by range reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start of the window.
    pub start: Timestamp,
    /// Exclusive end of the window.
    pub end: Timestamp,
}

impl TimeRange {
    /// Creates a query window.
    #[must_use]
    pub const fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }
}
