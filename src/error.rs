//! Error types for loading schemas, parsing edit scripts and checking results.
//!
//! The builder itself never fails; these cover the edges around it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors while parsing or compiling an edit script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid edit script: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("edit script must be an array of steps, got {actual}")]
    NotAList { actual: String },

    #[error("invalid property pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("step {index}: {message}")]
    InvalidStep { index: usize, message: String },
}

impl ScriptError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// The edited document does not compile as a JSON Schema.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl CheckError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Any failure surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize output: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Load(e) => e.exit_code(),
            CliError::Script(e) => e.exit_code(),
            CliError::Check(e) => e.exit_code(),
            CliError::WriteError { .. } => 3,
            CliError::Serialize { .. } => 2,
        }
    }
}
