//! wss-agent-core
//!
//! Payload transport for the agent client: streaming gzip+base64 codec
//! and the service dispatch protocol.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;
pub mod logging;

// Codec
pub mod compression;
pub mod telemetry;

// Service protocol
pub mod dispatch;

pub use types::{AgentError, Result};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{ClientConfig, CodecConfig};
    pub use crate::compression::{
        ChunkPolicy, ChunkWriter, ChunkedFileCodec, CodecError, CompressionError, StreamCompressor,
        StreamDecompressor,
    };
    pub use crate::dispatch::{
        AgentProjectInfo, AgentService, Coordinates, DependencyInfo, FormRequest, HttpTransport,
        RequestFactory, RequestType, ServiceDispatcher, ServiceRequest, ServiceResult, Transport,
        TransportError, UpdateType,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{AgentError, Result};
}
