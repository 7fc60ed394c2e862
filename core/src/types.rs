use thiserror::Error;

use crate::compression::CompressionError;
use crate::dispatch::{RequestType, TransportError};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Unified error for a service call, from BUILD through PARSE.
/// - `From<T>` impls let `?` cross the codec and transport layers.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Network or HTTP failure reaching the service.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body is not a valid envelope, or its data does not decode.
    #[error("protocol error: {reason}, response data is: {raw}")]
    Protocol { reason: String, raw: String },

    /// Envelope reported a non-success status.
    #[error("service error: {message}: {data}")]
    Service { message: String, data: String },

    /// Diff compression or decompression failed.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Request payload could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Typed call made with a request of another kind.
    #[error("request type mismatch: expected {expected}, got {actual}")]
    RequestMismatch { expected: RequestType, actual: RequestType },

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

impl AgentError {
    pub fn protocol(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        AgentError::Protocol { reason: reason.into(), raw: raw.into() }
    }
}
