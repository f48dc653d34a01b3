use std::path::PathBuf;

use glint_platform::{AppPathsError, TerminfoError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Paths(#[from] AppPathsError),

    #[error(transparent)]
    Terminfo(#[from] TerminfoError),

    #[error("Could not encode settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Could not determine the current directory: {0}")]
    CurrentDir(std::io::Error),

    #[error("Could not read settings {}: {source}", path.display())]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
