use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizlinkError {
    /// The peer dropped an established connection. The only failure class
    /// the flush engine recovers from; everything else is fatal.
    #[error("Connection reset by server")]
    ConnectionReset,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server rejected batch: {0}")]
    Rejected(String),

    #[error("Invalid acknowledgement: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VizlinkError>;
