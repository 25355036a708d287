use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

/// Failures reported by the window-manager layer
#[derive(Debug, Error)]
pub enum WmError {
    #[error("window {0} does not exist")]
    NoSuchWindow(CompactString),

    #[error("window manager IPC failed: {0}")]
    Ipc(String),
}

/// Failures while changing the desktop background
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("failed to load background {path:?}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("background {0:?} decoded to an empty image")]
    EmptyImage(PathBuf),
}

/// Failures while reading the shell configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
