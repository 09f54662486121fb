// src/error.rs
use std::path::PathBuf;

/// Fatal fault raised while parsing or routing a record stream
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Input error: {0}")]
    Input(#[source] std::io::Error),

    #[error("Failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open output file '{}': {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record for '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Coarse classification of a [`ProcessingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Input,
    Output,
    Config,
    Download,
}

impl ProcessingError {
    pub fn fault_kind(&self) -> FaultKind {
        match self {
            ProcessingError::Input(_) => FaultKind::Input,
            ProcessingError::CreateDir { .. }
            | ProcessingError::OpenOutput { .. }
            | ProcessingError::Write { .. }
            | ProcessingError::Encode { .. } => FaultKind::Output,
            ProcessingError::Config(_) => FaultKind::Config,
            ProcessingError::Download(_) => FaultKind::Download,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Failed to download '{url}': status code {code}")]
    Status { url: String, code: u16 },

    #[error("Failed to save download to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
