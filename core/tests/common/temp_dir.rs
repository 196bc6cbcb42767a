// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary state directory management for integration tests.
//!
//! This module provides a throwaway state directory for file-backed
//! engines, with automatic cleanup on drop.

use std::path::{Path, PathBuf};

/// Temporary state directory used for testing.
///
/// Automatically cleans up the directory when dropped.
#[derive(Debug)]
pub struct TempState {
    /// State directory for database files.
    pub state_dir: PathBuf,
}

impl TempState {
    /// Creates a new temporary state directory for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let state_dir = tempfile::tempdir()?.keep();
        Ok(Self { state_dir })
    }

    /// Gets the state directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.state_dir
    }

    /// Gets the path the engine stores its database file at.
    #[must_use]
    pub fn db_file(&self) -> PathBuf {
        self.state_dir.join("tempo.db")
    }
}

/// Sets up a temporary state directory for integration tests.
///
/// This is a convenience wrapper around [`TempState::new`].
///
/// # Errors
///
/// Returns an error if directory creation fails.
///
/// # Example
///
/// ```ignore
/// let state = setup_temp_state()?;
/// // Pass state.path() as the engine's state directory
/// // Automatically cleaned up when dropped
/// ```
pub fn setup_temp_state() -> Result<TempState, Box<dyn std::error::Error>> {
    TempState::new()
}

// Implement Drop for automatic cleanup
impl Drop for TempState {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.state_dir) {
            tracing::warn!(
                path = %self.state_dir.display(),
                err = %e,
                "failed to clean up temp directory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_state_creates_directory() {
        let state = TempState::new().unwrap();

        assert!(state.path().exists());
        assert!(state.path().is_dir());
    }

    #[test]
    fn temp_state_db_file_lives_under_state_dir() {
        let state = TempState::new().unwrap();

        assert!(state.db_file().starts_with(state.path()));
        assert_eq!(state.db_file().extension().unwrap().to_str().unwrap(), "db");
    }

    #[test]
    fn temp_state_cleanup_on_drop() {
        let dir = {
            let state = TempState::new().unwrap();
            let dir = state.path().to_path_buf();
            assert!(dir.exists());
            dir
        };

        // After drop, the directory should be removed
        assert!(!dir.exists());
    }

    #[test]
    fn setup_temp_state_convenience_function() {
        let state = setup_temp_state().unwrap();

        assert!(state.path().exists());
    }
}
