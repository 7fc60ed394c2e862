//! constants.rs
//! Wire names, defaults and sizing shared by the codec and the dispatcher.

/// Buffer threshold used for chunking and stream copies (32 KiB).
pub const BYTES_BUFFER_SIZE: usize = 32 * 1024;

/// Texts at or below this length are written as a single chunk.
pub const STRING_MAX_SIZE: usize = BYTES_BUFFER_SIZE;

/// Chunks allowed in flight between producer and consumer.
pub const DEFAULT_PIPE_DEPTH: usize = 4;

/// Temp file naming for the file-backed codec.
pub const TMP_IN_PREFIX: &str = "tmp_in_";
pub const TMP_OUT_PREFIX: &str = "tmp_out_";
pub const TMP_SUFFIX: &str = ".json";

/// Service defaults.
pub const DEFAULT_SERVICE_URL: &str = "https://saas.whitesourcesoftware.com/agent";
pub const DEFAULT_CONNECTION_TIMEOUT_MINUTES: u64 = 60;
pub const DEFAULT_AGENT: &str = "generic";
pub const DEFAULT_AGENT_VERSION: &str = "1.0";
pub const DEFAULT_PLUGIN_VERSION: &str = "1.0";

/// Environment keys read by `ClientConfig::from_env`.
pub mod env_keys {
    pub const SERVICE_URL: &str = "WSS_URL";
    pub const CONNECTION_TIMEOUT_MINUTES: &str = "WSS_CONNECTION_TIMEOUT_MINUTES";
    pub const TEMP_DIR: &str = "WSS_TEMP_DIR";
}

/// Outbound form field names.
pub mod params {
    pub const TOKEN: &str = "token";
    pub const PRODUCT: &str = "product";
    pub const PRODUCT_VERSION: &str = "productVersion";
    pub const DIFF: &str = "diff";
    pub const AGENT: &str = "agent";
    pub const AGENT_VERSION: &str = "agentVersion";
    pub const PLUGIN_VERSION: &str = "pluginVersion";
    pub const REQUEST_TYPE: &str = "type";
    pub const TIME_STAMP: &str = "timeStamp";
    pub const REQUESTER_EMAIL: &str = "requesterEmail";
    pub const UPDATE_TYPE: &str = "updateType";
    pub const FORCE_CHECK_ALL_DEPENDENCIES: &str = "forceCheckAllDependencies";
}

/// HTTP content types.
pub const APPLICATION_JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=UTF-8";
