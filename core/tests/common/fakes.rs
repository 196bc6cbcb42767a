// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! In-process stand-in for the sync service.
//!
//! [`FakeRemote`] behaves like a tiny single-tenant server: entities live in
//! maps keyed by uid, completions mint `done-{n}` identifiers, and reads or
//! writes can be switched to fail to simulate an unreachable service.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use jiff::Timestamp;
use tempo_core::{
    DoneTodo, EventDetail, RemoteApi, RemoteError, ScheduleEvent, Tag, TimeRange, TodoEvent,
};

#[derive(Debug, Default)]
struct ServerState {
    tags: BTreeMap<String, Tag>,
    todos: BTreeMap<String, TodoEvent>,
    schedules: BTreeMap<String, ScheduleEvent>,
    details: BTreeMap<String, EventDetail>,
}

/// In-memory sync service for integration tests.
#[derive(Debug, Default)]
pub struct FakeRemote {
    state: Mutex<ServerState>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    done_seq: AtomicU32,
    put_calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    /// Makes every write attempt fail with a 503 until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every read attempt fail with a 503 until switched back.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Every put attempt seen so far, as `"{kind} {uid}"`, including the
    /// attempts that failed.
    #[must_use]
    pub fn put_calls(&self) -> Vec<String> {
        self.put_calls.lock().unwrap().clone()
    }

    /// Seeds a tag on the server side.
    pub fn insert_tag(&self, tag: Tag) {
        self.state.lock().unwrap().tags.insert(tag.uid.clone(), tag);
    }

    /// Seeds a todo on the server side.
    pub fn insert_todo(&self, todo: TodoEvent) {
        self.state
            .lock()
            .unwrap()
            .todos
            .insert(todo.uid.clone(), todo);
    }

    /// Seeds a schedule on the server side.
    pub fn insert_schedule(&self, schedule: ScheduleEvent) {
        self.state
            .lock()
            .unwrap()
            .schedules
            .insert(schedule.uid.clone(), schedule);
    }

    /// Seeds an event detail on the server side.
    pub fn insert_detail(&self, detail: EventDetail) {
        self.state
            .lock()
            .unwrap()
            .details
            .insert(detail.uid.clone(), detail);
    }

    /// The tag as the server currently stores it.
    #[must_use]
    pub fn tag(&self, uid: &str) -> Option<Tag> {
        self.state.lock().unwrap().tags.get(uid).cloned()
    }

    /// The todo as the server currently stores it.
    #[must_use]
    pub fn todo(&self, uid: &str) -> Option<TodoEvent> {
        self.state.lock().unwrap().todos.get(uid).cloned()
    }

    /// The schedule as the server currently stores it.
    #[must_use]
    pub fn schedule(&self, uid: &str) -> Option<ScheduleEvent> {
        self.state.lock().unwrap().schedules.get(uid).cloned()
    }

    /// The event detail as the server currently stores it.
    #[must_use]
    pub fn detail(&self, uid: &str) -> Option<EventDetail> {
        self.state.lock().unwrap().details.get(uid).cloned()
    }

    fn record_put(&self, call: String) {
        self.put_calls.lock().unwrap().push(call);
    }

    fn write_gate(&self) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn read_gate(&self) -> Result<(), RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for FakeRemote {
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        self.read_gate()?;
        Ok(self.state.lock().unwrap().tags.values().cloned().collect())
    }

    async fn put_tag(&self, tag: &Tag) -> Result<Tag, RemoteError> {
        self.record_put(format!("tag {}", tag.uid));
        self.write_gate()?;
        self.insert_tag(tag.clone());
        Ok(tag.clone())
    }

    async fn delete_tag(&self, uid: &str) -> Result<(), RemoteError> {
        self.write_gate()?;
        match self.state.lock().unwrap().tags.remove(uid) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound(format!("/v1/tags/{uid}"))),
        }
    }

    async fn list_todos(&self, range: TimeRange) -> Result<Vec<TodoEvent>, RemoteError> {
        self.read_gate()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .todos
            .values()
            .filter(|todo| {
                todo.due_at
                    .is_some_and(|due| range.start <= due && due < range.end)
            })
            .cloned()
            .collect())
    }

    async fn put_todo(&self, todo: &TodoEvent) -> Result<TodoEvent, RemoteError> {
        self.record_put(format!("todo {}", todo.uid));
        self.write_gate()?;
        self.insert_todo(todo.clone());
        Ok(todo.clone())
    }

    async fn delete_todo(&self, uid: &str) -> Result<(), RemoteError> {
        self.write_gate()?;
        match self.state.lock().unwrap().todos.remove(uid) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound(format!("/v1/todos/{uid}"))),
        }
    }

    async fn complete_todo(&self, todo: &TodoEvent) -> Result<DoneTodo, RemoteError> {
        self.write_gate()?;
        let done_id = format!("done-{}", self.done_seq.fetch_add(1, Ordering::SeqCst) + 1);
        let completed = TodoEvent {
            completed_at: Some(Timestamp::now()),
            done_id: Some(done_id.clone()),
            ..todo.clone()
        };
        self.insert_todo(completed.clone());
        Ok(DoneTodo {
            done_id,
            todo: completed,
        })
    }

    async fn revert_todo(
        &self,
        uid: &str,
        _done_id: Option<&str>,
    ) -> Result<TodoEvent, RemoteError> {
        self.write_gate()?;
        let mut state = self.state.lock().unwrap();
        let Some(todo) = state.todos.get(uid) else {
            return Err(RemoteError::NotFound(format!("/v1/todos/{uid}/revert")));
        };
        let reopened = TodoEvent {
            completed_at: None,
            done_id: None,
            ..todo.clone()
        };
        state.todos.insert(uid.to_string(), reopened.clone());
        Ok(reopened)
    }

    async fn list_schedules(&self, range: TimeRange) -> Result<Vec<ScheduleEvent>, RemoteError> {
        self.read_gate()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .schedules
            .values()
            .filter(|s| s.starts_at < range.end && s.ends_at > range.start)
            .cloned()
            .collect())
    }

    async fn put_schedule(&self, schedule: &ScheduleEvent) -> Result<ScheduleEvent, RemoteError> {
        self.record_put(format!("schedule {}", schedule.uid));
        self.write_gate()?;
        self.insert_schedule(schedule.clone());
        Ok(schedule.clone())
    }

    async fn delete_schedule(&self, uid: &str) -> Result<(), RemoteError> {
        self.write_gate()?;
        match self.state.lock().unwrap().schedules.remove(uid) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound(format!("/v1/schedules/{uid}"))),
        }
    }

    async fn get_event_detail(&self, uid: &str) -> Result<Option<EventDetail>, RemoteError> {
        self.read_gate()?;
        Ok(self.detail(uid))
    }

    async fn put_event_detail(&self, detail: &EventDetail) -> Result<EventDetail, RemoteError> {
        self.record_put(format!("detail {}", detail.uid));
        self.write_gate()?;
        self.insert_detail(detail.clone());
        Ok(detail.clone())
    }

    async fn delete_event_detail(&self, uid: &str) -> Result<(), RemoteError> {
        self.write_gate()?;
        match self.state.lock().unwrap().details.remove(uid) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound(format!("/v1/event-details/{uid}"))),
        }
    }
}
