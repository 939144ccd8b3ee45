use thiserror::Error;

/// Errors raised inside the sync and storage layers.
///
/// None of these reach a surface: ingestion logs and drops them, and the
/// store turns unreadable data into an empty snapshot.
#[derive(Error, Debug)]
pub enum WearcalError {
    #[error("malformed sync payload: {0}")]
    MalformedPayload(String),

    #[error("corrupt persisted data: {0}")]
    CorruptPersistedData(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type WearcalResult<T> = Result<T, WearcalError>;
