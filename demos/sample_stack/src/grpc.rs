//! gRPC client settings embedded by every component that dials another.

use std::time::Duration;

use flagdoc::{ConfigSchema, Flag, FlagSet, FlagdocError};
use serde::{Deserialize, Serialize};

/// Retry backoff settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct BackoffConfig {
    /// Minimum delay when backing off.
    pub min_period: Duration,
    /// Maximum delay when backing off.
    pub max_period: Duration,
    /// Number of times to backoff and retry before failing.
    pub max_retries: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_period: Duration::from_millis(100),
            max_period: Duration::from_secs(10),
            max_retries: 10,
        }
    }
}

/// Client settings for a gRPC connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct GrpcClientConfig {
    /// gRPC client max receive message size in bytes.
    pub max_recv_msg_size: u64,
    /// gRPC client max send message size in bytes.
    pub max_send_msg_size: u64,
    /// Compression algorithm to use, if any.
    #[serde(rename = "grpc_compression")]
    #[flagdoc(default = "none")]
    pub compression: Option<String>,
    /// Enable backoff and retry when rate limits are hit.
    pub backoff_on_ratelimits: bool,
    /// Backoff applied to rate-limited calls.
    pub backoff_config: BackoffConfig,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            max_recv_msg_size: 100 << 20,
            max_send_msg_size: 100 << 20,
            compression: None,
            backoff_on_ratelimits: false,
            backoff_config: BackoffConfig::default(),
        }
    }
}

impl GrpcClientConfig {
    /// Registers the client flags below `prefix`, which carries no trailing
    /// separator.
    ///
    /// # Errors
    ///
    /// Propagates registration failures.
    pub fn register_flags_with_prefix(
        &self,
        prefix: &str,
        flags: &mut FlagSet<'_>,
    ) -> Result<(), FlagdocError> {
        flags.add(
            "max_recv_msg_size",
            Flag::new(
                format!("{prefix}.grpc-max-recv-msg-size"),
                &self.max_recv_msg_size,
                "gRPC client max receive message size (bytes).",
            ),
        )?;
        flags.add(
            "max_send_msg_size",
            Flag::new(
                format!("{prefix}.grpc-max-send-msg-size"),
                &self.max_send_msg_size,
                "gRPC client max send message size (bytes).",
            ),
        )?;
        flags.add(
            "compression",
            Flag::new(
                format!("{prefix}.grpc-compression"),
                "",
                "Use compression when sending messages. Supported values are: 'gzip', 'snappy' and '' (disable compression)",
            ),
        )?;
        flags.add(
            "backoff_on_ratelimits",
            Flag::new(
                format!("{prefix}.backoff-on-ratelimits"),
                &self.backoff_on_ratelimits,
                "Enable backoff and retry when we hit rate limits.",
            ),
        )?;
        let mut backoff = flags.nested("backoff_config");
        backoff.add(
            "min_period",
            Flag::new(
                format!("{prefix}.backoff-min-period"),
                &self.backoff_config.min_period,
                "Minimum delay when backing off.",
            ),
        )?;
        backoff.add(
            "max_period",
            Flag::new(
                format!("{prefix}.backoff-max-period"),
                &self.backoff_config.max_period,
                "Maximum delay when backing off.",
            ),
        )?;
        backoff.add(
            "max_retries",
            Flag::new(
                format!("{prefix}.backoff-retries"),
                &self.backoff_config.max_retries,
                "Number of times to backoff and retry before failing.",
            ),
        )
    }
}
