// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the Tempo sync service.
//!
//! One method per endpoint; every write returns the server's canonical
//! representation of the entity, which callers use to refresh local caches.

use reqwest::Method;
use serde::Serialize;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::http::HttpClient;
use crate::types::{DoneTodo, EventDetail, ScheduleEvent, Tag, TimeRange, TodoEvent};

/// Client for the Tempo sync service.
#[derive(Debug)]
pub struct Client {
    http: HttpClient,
}

#[derive(Serialize)]
struct RevertBody<'a> {
    done_id: Option<&'a str>,
}

impl Client {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable or HTTP client
    /// creation fails.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = HttpClient::new(config)?;
        Ok(Self { http })
    }

    /// Lists all tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        let req = self.http.build_request(Method::GET, "/v1/tags");
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Creates or replaces a tag, returning the server's canonical copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn put_tag(&self, tag: &Tag) -> Result<Tag, RemoteError> {
        tracing::debug!(uid = %tag.uid, "uploading tag");
        let path = format!("/v1/tags/{}", tag.uid);
        let req = self.http.build_request(Method::PUT, &path).json(tag);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Deletes a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_tag(&self, uid: &str) -> Result<(), RemoteError> {
        let path = format!("/v1/tags/{uid}");
        let req = self.http.build_request(Method::DELETE, &path);
        self.http.execute(req).await?;
        Ok(())
    }

    /// Lists todos due within the given range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_todos(&self, range: TimeRange) -> Result<Vec<TodoEvent>, RemoteError> {
        let req = self
            .http
            .build_request(Method::GET, "/v1/todos")
            .query(&[("from", range.start.to_string()), ("to", range.end.to_string())]);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Creates or replaces a todo, returning the server's canonical copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn put_todo(&self, todo: &TodoEvent) -> Result<TodoEvent, RemoteError> {
        tracing::debug!(uid = %todo.uid, "uploading todo");
        let path = format!("/v1/todos/{}", todo.uid);
        let req = self.http.build_request(Method::PUT, &path).json(todo);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Deletes a todo.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_todo(&self, uid: &str) -> Result<(), RemoteError> {
        let path = format!("/v1/todos/{uid}");
        let req = self.http.build_request(Method::DELETE, &path);
        self.http.execute(req).await?;
        Ok(())
    }

    /// Records a completion for the todo. The server mints the `done_id`
    /// needed to revert it later.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn complete_todo(&self, todo: &TodoEvent) -> Result<DoneTodo, RemoteError> {
        tracing::debug!(uid = %todo.uid, "completing todo");
        let path = format!("/v1/todos/{}/complete", todo.uid);
        let req = self.http.build_request(Method::POST, &path).json(todo);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Reverts a previously recorded completion. `done_id` may be absent when
    /// the completion request is still in flight; the server then resolves
    /// the completion record by the todo's uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn revert_todo(
        &self,
        uid: &str,
        done_id: Option<&str>,
    ) -> Result<TodoEvent, RemoteError> {
        tracing::debug!(uid, done_id, "reverting todo completion");
        let path = format!("/v1/todos/{uid}/revert");
        let req = self
            .http
            .build_request(Method::POST, &path)
            .json(&RevertBody { done_id });
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Lists schedule events overlapping the given range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_schedules(
        &self,
        range: TimeRange,
    ) -> Result<Vec<ScheduleEvent>, RemoteError> {
        let req = self
            .http
            .build_request(Method::GET, "/v1/schedules")
            .query(&[("from", range.start.to_string()), ("to", range.end.to_string())]);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Creates or replaces a schedule event, returning the server's canonical
    /// copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn put_schedule(
        &self,
        schedule: &ScheduleEvent,
    ) -> Result<ScheduleEvent, RemoteError> {
        tracing::debug!(uid = %schedule.uid, "uploading schedule");
        let path = format!("/v1/schedules/{}", schedule.uid);
        let req = self.http.build_request(Method::PUT, &path).json(schedule);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Deletes a schedule event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_schedule(&self, uid: &str) -> Result<(), RemoteError> {
        let path = format!("/v1/schedules/{uid}");
        let req = self.http.build_request(Method::DELETE, &path);
        self.http.execute(req).await?;
        Ok(())
    }

    /// Fetches the detail record for an event, `None` if the server has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than the
    /// record being absent.
    pub async fn get_event_detail(&self, uid: &str) -> Result<Option<EventDetail>, RemoteError> {
        let path = format!("/v1/event-details/{uid}");
        let req = self.http.build_request(Method::GET, &path);
        match self.http.execute(req).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(RemoteError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates or replaces an event detail record, returning the server's
    /// canonical copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn put_event_detail(&self, detail: &EventDetail) -> Result<EventDetail, RemoteError> {
        tracing::debug!(uid = %detail.uid, "uploading event detail");
        let path = format!("/v1/event-details/{}", detail.uid);
        let req = self.http.build_request(Method::PUT, &path).json(detail);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Deletes an event detail record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_event_detail(&self, uid: &str) -> Result<(), RemoteError> {
        let path = format!("/v1/event-details/{uid}");
        let req = self.http.build_request(Method::DELETE, &path);
        self.http.execute(req).await?;
        Ok(())
    }
}
