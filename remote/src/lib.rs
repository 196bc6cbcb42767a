// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the Tempo sync service: typed request/response calls for
//! tags, todos, schedules and event details.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod client;
mod config;
mod error;
mod http;
mod types;

pub use crate::client::Client;
pub use crate::config::{AuthMethod, RemoteConfig};
pub use crate::error::RemoteError;
pub use crate::types::{DoneTodo, EventDetail, ScheduleEvent, Tag, TimeRange, TodoEvent};
