//! dispatch/envelope.rs
//! Outer status envelope wrapping every service response.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::{AgentError, Result};

#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum EnvelopeStatus {
    Success = 0,
    Error = 1,
}

impl EnvelopeStatus {
    /// Any status other than the success sentinel is an error.
    pub fn from_raw(raw: i32) -> Self {
        EnvelopeStatus::try_from_primitive(raw).unwrap_or(EnvelopeStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub status: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl ResultEnvelope {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Success as i32,
            message: Some("ok".to_string()),
            data: Some(data.into()),
        }
    }

    pub fn status(&self) -> EnvelopeStatus {
        EnvelopeStatus::from_raw(self.status)
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn data(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }

    /// Parse a raw response body. `null`, empty or malformed bodies are
    /// protocol errors carrying the raw body.
    pub fn parse(body: &str) -> Result<Self> {
        match serde_json::from_str::<Option<ResultEnvelope>>(body) {
            Ok(Some(envelope)) => Ok(envelope),
            Ok(None) => Err(AgentError::protocol("empty response", body)),
            Err(e) => Err(AgentError::protocol(format!("malformed envelope: {e}"), body)),
        }
    }

    /// Return `data` for a successful envelope, otherwise a service error
    /// carrying the envelope's message and data.
    pub fn into_data(self) -> Result<String> {
        match self.status() {
            EnvelopeStatus::Success => Ok(self.data.unwrap_or_default()),
            EnvelopeStatus::Error => Err(AgentError::Service {
                message: self.message.unwrap_or_default(),
                data: self.data.unwrap_or_default(),
            }),
        }
    }
}
