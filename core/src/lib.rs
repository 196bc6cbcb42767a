// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

mod config;
mod dispatch;
mod error;
mod localdb;
mod read_through;
mod tempo;
mod toggle;
mod types;
mod uploader;

pub use crate::config::{Config, default_state_dir};
pub use crate::dispatch::RemoteApi;
pub use crate::error::Error;
pub use crate::tempo::Tempo;
pub use crate::toggle::ToggleResult;
pub use crate::types::{EntityKind, MAX_UPLOAD_ATTEMPTS, UploadTask};

pub use tempo_remote::{
    AuthMethod, Client, DoneTodo, EventDetail, RemoteConfig, RemoteError, ScheduleEvent, Tag,
    TimeRange, TodoEvent,
};
