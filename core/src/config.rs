// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use tempo_remote::RemoteConfig;

use crate::Error;

/// The name of the Tempo application.
pub const APP_NAME: &str = "tempo";

/// Configuration for the Tempo engine.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory for the local database. `None` keeps all state in memory.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Sync service connection.
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Error> {
        if let Some(dir) = &self.state_dir {
            self.state_dir = Some(expand_path(dir)?);
        }
        Ok(())
    }
}

/// Platform state directory for the application, e.g. `~/.local/state/tempo`
/// on Linux. `None` when the platform offers no state directory.
#[must_use]
pub fn default_state_dir() -> Option<PathBuf> {
    get_state_dir().ok().map(|dir| dir.join(APP_NAME))
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path
        .to_str()
        .ok_or_else(|| Error::Config("Invalid path encoding".into()))?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Error> {
    dirs::home_dir().ok_or_else(|| Error::Config("User-specific home directory not found".into()))
}

fn get_state_dir() -> Result<PathBuf, Error> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| Error::Config("User-specific state directory not found".into()))
}
