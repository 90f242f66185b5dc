//! Error types for the record store layer.

/// Errors that can occur reading or writing durable room records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record failed to serialize or deserialize.
    #[error("record codec failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// A write (upsert or delete) was rejected by the backing store.
    #[error("store write failed: {0}")]
    Write(String),

    /// A read was rejected by the backing store.
    #[error("store read failed: {0}")]
    Read(String),
}
