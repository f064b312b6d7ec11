//! Hash ring and key-value store settings shared by several components.

use std::time::Duration;

use flagdoc::{ConfigSchema, Flag, FlagSet, FlagdocError};
use serde::{Deserialize, Serialize};

/// Consul client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct ConsulConfig {
    /// Hostname and port of Consul.
    pub host: String,
    /// ACL token used to talk to Consul.
    pub acl_token: String,
    /// HTTP timeout when talking to Consul.
    pub http_client_timeout: Duration,
    /// Enable consistent reads to Consul.
    pub consistent_reads: bool,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8500".to_owned(),
            acl_token: String::new(),
            http_client_timeout: Duration::from_secs(20),
            consistent_reads: false,
        }
    }
}

impl ConsulConfig {
    /// Registers the Consul flags below `prefix`.
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
            "host",
            Flag::new(
                format!("{prefix}consul.hostname"),
                &self.host,
                "Hostname and port of Consul.",
            ),
        )?;
        flags.add(
            "acl_token",
            Flag::new(
                format!("{prefix}consul.acl-token"),
                &self.acl_token,
                "ACL Token used to interact with Consul.",
            ),
        )?;
        flags.add(
            "http_client_timeout",
            Flag::new(
                format!("{prefix}consul.client-timeout"),
                &self.http_client_timeout,
                "HTTP timeout when talking to Consul.",
            )
            .advanced(),
        )?;
        flags.add(
            "consistent_reads",
            Flag::new(
                format!("{prefix}consul.consistent-reads"),
                &self.consistent_reads,
                "Enable consistent reads to Consul.",
            )
            .advanced(),
        )
    }
}

/// Backend used to store ring state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct KvConfig {
    /// Backend storage to use for the ring.
    pub store: String,
    /// The prefix for the keys in the store.
    pub prefix: String,
    /// Configuration for a Consul client.
    #[flagdoc(description = "Configuration for a Consul client. Only applies if store is consul.")]
    pub consul: ConsulConfig,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            store: "consul".to_owned(),
            prefix: "collectors/".to_owned(),
            consul: ConsulConfig::default(),
        }
    }
}

/// Hash ring membership settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct RingConfig {
    /// Key-value store holding the ring.
    pub kvstore: KvConfig,
    /// The heartbeat timeout after which instances are considered unhealthy.
    pub heartbeat_timeout: Duration,
    /// The number of replicas each sample is written to.
    pub replication_factor: u32,
    /// True to enable zone-awareness and replicate across zones.
    pub zone_awareness_enabled: bool,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            kvstore: KvConfig::default(),
            heartbeat_timeout: Duration::from_secs(60),
            replication_factor: 3,
            zone_awareness_enabled: false,
        }
    }
}

impl RingConfig {
    /// Registers the ring flags below `prefix`, for example `distributor.`.
    ///
    /// # Errors
    ///
    /// Propagates registration failures.
    pub fn register_flags_with_prefix(
        &self,
        prefix: &str,
        flags: &mut FlagSet<'_>,
    ) -> Result<(), FlagdocError> {
        let ring = format!("{prefix}ring.");
        let mut kvstore = flags.nested("kvstore");
        kvstore.add(
            "store",
            Flag::new(
                format!("{ring}store"),
                &self.kvstore.store,
                "Backend storage to use for the ring. Supported values are: consul, etcd, inmemory, memberlist, multi.",
            ),
        )?;
        kvstore.add(
            "prefix",
            Flag::new(
                format!("{ring}prefix"),
                &self.kvstore.prefix,
                "The prefix for the keys in the store.",
            ),
        )?;
        self.kvstore
            .consul
            .register_flags_with_prefix(&ring, &mut kvstore.nested("consul"))?;

        flags.add(
            "heartbeat_timeout",
            Flag::new(
                format!("{ring}heartbeat-timeout"),
                &self.heartbeat_timeout,
                "The heartbeat timeout after which instances are assumed to be unhealthy. 0 = never (timeout disabled).",
            ),
        )?;
        flags.add(
            "replication_factor",
            Flag::new(
                format!("{ring}replication-factor"),
                &self.replication_factor,
                "",
            ),
        )?;
        flags.add(
            "zone_awareness_enabled",
            Flag::new(
                format!("{ring}zone-awareness-enabled"),
                &self.zone_awareness_enabled,
                "True to enable the zone-awareness and replicate ingested samples across different availability zones.",
            )
            .experimental(),
        )
    }
}
