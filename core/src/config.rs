//! config.rs
//! Client and codec configuration.
//!
//! Values are explicit and threaded into the components that use them; there
//! is no process-wide state. `from_env` reads overrides from the environment,
//! falling back to defaults for missing, empty or invalid values.

use std::path::PathBuf;
use std::time::Duration;

use crate::compression::ChunkPolicy;
use crate::constants::{
    env_keys, DEFAULT_AGENT, DEFAULT_AGENT_VERSION, DEFAULT_CONNECTION_TIMEOUT_MINUTES,
    DEFAULT_PIPE_DEPTH, DEFAULT_PLUGIN_VERSION, DEFAULT_SERVICE_URL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub chunk_policy: ChunkPolicy,
    /// Chunks in flight between producer and consumer.
    pub pipe_depth: usize,
    /// Directory for the file-backed codec's temp files.
    pub temp_dir: PathBuf,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_policy: ChunkPolicy::default(),
            pipe_depth: DEFAULT_PIPE_DEPTH,
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl CodecConfig {
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn with_chunk_policy(mut self, policy: ChunkPolicy) -> Self {
        self.chunk_policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub service_url: String,
    /// Applied to both connect and whole-request timeouts.
    pub connection_timeout: Duration,
    pub agent: String,
    pub agent_version: String,
    pub plugin_version: String,
    pub codec: CodecConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            connection_timeout: Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_MINUTES * 60),
            agent: DEFAULT_AGENT.to_string(),
            agent_version: DEFAULT_AGENT_VERSION.to_string(),
            plugin_version: DEFAULT_PLUGIN_VERSION.to_string(),
            codec: CodecConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(agent: &str, agent_version: &str, plugin_version: &str) -> Self {
        Self {
            agent: agent.to_string(),
            agent_version: agent_version.to_string(),
            plugin_version: plugin_version.to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `WSS_URL`, `WSS_CONNECTION_TIMEOUT_MINUTES`
    /// and `WSS_TEMP_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = non_empty(env_keys::SERVICE_URL) {
            config.service_url = url;
        }

        if let Some(raw) = non_empty(env_keys::CONNECTION_TIMEOUT_MINUTES) {
            match raw.parse::<i64>().ok().and_then(minutes) {
                Some(timeout) => config.connection_timeout = timeout,
                None => tracing::warn!(value = %raw, "ignoring invalid connection timeout"),
            }
        }

        if let Some(dir) = non_empty(env_keys::TEMP_DIR) {
            config.codec.temp_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn with_service_url(mut self, url: &str) -> Self {
        if !url.trim().is_empty() {
            self.service_url = url.trim().to_string();
        }
        self
    }

    /// Non-positive or out-of-range values keep the current timeout.
    pub fn with_connection_timeout_minutes(mut self, timeout: i64) -> Self {
        if let Some(timeout) = minutes(timeout) {
            self.connection_timeout = timeout;
        }
        self
    }

    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }
}

/// `None` for non-positive counts or when the seconds overflow.
fn minutes(m: i64) -> Option<Duration> {
    let m = u64::try_from(m).ok().filter(|m| *m > 0)?;
    m.checked_mul(60).map(Duration::from_secs)
}
