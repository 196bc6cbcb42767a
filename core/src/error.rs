// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use tempo_remote::RemoteError;

/// Engine errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local database failure.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// Schema migration failure while opening the database.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Filesystem failure while preparing local state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by the sync service client.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A referenced entity does not exist locally.
    #[error("{what} not found: {uid}")]
    NotFound {
        /// Kind of entity that was looked up.
        what: &'static str,
        /// Uid that was looked up.
        uid: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
