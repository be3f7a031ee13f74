use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {details}")]
    ConfigInvalid { field: &'static str, details: String },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage paths: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create directory {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session store at {path} is in use by another codebluer process")]
    SessionStoreBusy { path: PathBuf },
    #[error("failed to create session lock at {path}: {source}")]
    SessionLockCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read session file at {path}: {source}")]
    SessionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file at {path} is corrupt: {source}")]
    SessionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write session file at {path}: {source}")]
    SessionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to initialize backend client: {details}")]
    BackendInit { details: String },
    #[error("failed to start background worker: {source}")]
    WorkerSpawn {
        #[source]
        source: std::io::Error,
    },
}
