use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn an item into its hover preview form.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("Item has no id")]
    MissingId,
    #[error("Item {id} has an invalid stack size of {count}")]
    InvalidCount { id: String, count: u32 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

/// Failure to hand a rendered line to one recipient.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{name} is no longer connected")]
    Disconnected { name: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

/// Outcome carried by a `DispatchHandle` when the dispatch task itself could
/// not run to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("The message worker is not running")]
    WorkerStopped,
    #[error("The message task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed toml in {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("Invalid value in {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        source: toml::de::Error,
    },
}
