use std::io;
use std::path::PathBuf;

use thiserror::Error;


/// Status of a failed load or save of the rename history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history file {path:?} is not a valid document: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HistoryError {

    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::Json { path: path.to_path_buf(), source }
    }
}


#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot locate the running executable: {0}")]
    Executable(#[source] io::Error),
}


/// Reasons a candidate preset name is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("The name is not allowed to be empty.")]
    Empty,
    #[error("Enter a different name.")]
    Unchanged,
    #[error("Illegal characters: < > [ ] : / \\ | ? * \"")]
    IllegalCharacter(char),
    #[error("Name is invalid; illegal suffix: {0}")]
    IllegalSuffix(&'static str),
    #[error("Name is unavailable.")]
    Reserved,
    #[error("Preset \"{0}\" already exists.")]
    AlreadyExists(String),
    #[error("The name cannot be the same as a preset alias name.")]
    AliasCollision,
}


#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile type {0:?}, expected \"printer\" or \"filament\"")]
pub struct UnknownProfileType(pub String);


/// A persisted record that breaks the rename record invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rename record needs a printer or filament type and two different non-empty names")]
pub struct MalformedRecord;
