//! Per-component settings of the stack.

use std::time::Duration;

use flagdoc::{ConfigSchema, Flag, FlagSet, FlagdocError};
use serde::{Deserialize, Serialize};

use crate::grpc::GrpcClientConfig;
use crate::ring::RingConfig;

/// HTTP and gRPC server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server listen port.
    pub http_listen_port: u16,
    /// gRPC server listen port.
    pub grpc_listen_port: u16,
    /// Timeout for graceful shutdowns.
    pub graceful_shutdown_timeout: Duration,
    /// Only log messages with the given severity or above.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_listen_port: 3100,
            grpc_listen_port: 9095,
            graceful_shutdown_timeout: Duration::from_secs(30),
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        flags.add(
            "http_listen_port",
            Flag::new(
                "server.http-listen-port",
                &self.http_listen_port,
                "HTTP server listen port.",
            ),
        )?;
        flags.add(
            "grpc_listen_port",
            Flag::new(
                "server.grpc-listen-port",
                &self.grpc_listen_port,
                "gRPC server listen port.",
            ),
        )?;
        flags.add(
            "graceful_shutdown_timeout",
            Flag::new(
                "server.graceful-shutdown-timeout",
                &self.graceful_shutdown_timeout,
                "Timeout for graceful shutdowns.",
            ),
        )?;
        flags.add(
            "log_level",
            Flag::new(
                "log.level",
                &self.log_level,
                "Only log messages with the given severity or above. Valid levels: [debug, info, warn, error]",
            ),
        )
    }
}

/// Distributor settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct DistributorConfig {
    /// Ring the distributors use to coordinate rate limits.
    pub ring: RingConfig,
}

impl DistributorConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        self.ring
            .register_flags_with_prefix("distributor.", &mut flags.nested("ring"))
    }
}

/// Ingester lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct LifecyclerConfig {
    /// Ring the ingesters join.
    pub ring: RingConfig,
    /// Number of tokens for each ingester.
    pub num_tokens: u32,
    /// Period at which to heartbeat to the ring.
    pub heartbeat_period: Duration,
    /// Period to wait for a claim from another member before joining.
    #[serde(rename = "join_after")]
    pub join_after_period: Duration,
    /// Port the ingester listens on; copied from the server settings.
    #[serde(skip)]
    pub listen_port: u16,
}

impl Default for LifecyclerConfig {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            num_tokens: 128,
            heartbeat_period: Duration::from_secs(5),
            join_after_period: Duration::ZERO,
            listen_port: 0,
        }
    }
}

impl LifecyclerConfig {
    fn register_flags_with_prefix(
        &self,
        prefix: &str,
        flags: &mut FlagSet<'_>,
    ) -> Result<(), FlagdocError> {
        self.ring
            .register_flags_with_prefix(prefix, &mut flags.nested("ring"))?;
        flags.add(
            "num_tokens",
            Flag::new(
                format!("{prefix}num-tokens"),
                &self.num_tokens,
                "Number of tokens for each ingester.",
            ),
        )?;
        flags.add(
            "heartbeat_period",
            Flag::new(
                format!("{prefix}heartbeat-period"),
                &self.heartbeat_period,
                "Period at which to heartbeat to consul. 0 = disabled.",
            ),
        )?;
        flags.add(
            "join_after_period",
            Flag::new(
                format!("{prefix}join-after"),
                &self.join_after_period,
                "Period to wait for a claim from another member; will join automatically after this.",
            ),
        )
    }
}

/// Ingester settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct IngesterConfig {
    /// Ring membership of this ingester.
    pub lifecycler: LifecyclerConfig,
    /// How long chunks should sit in memory with no updates before being
    /// flushed.
    pub chunk_idle_period: Duration,
    /// Number of times to try and transfer chunks before falling back to
    /// flushing.
    #[flagdoc(deprecated)]
    pub max_transfer_retries: u32,
}

impl Default for IngesterConfig {
    fn default() -> Self {
        Self {
            lifecycler: LifecyclerConfig::default(),
            chunk_idle_period: Duration::from_secs(30 * 60),
            max_transfer_retries: 0,
        }
    }
}

impl IngesterConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        self.lifecycler
            .register_flags_with_prefix("ingester.", &mut flags.nested("lifecycler"))?;
        flags.add(
            "chunk_idle_period",
            Flag::new(
                "ingester.chunks-idle-period",
                &self.chunk_idle_period,
                "",
            ),
        )?;
        flags.add(
            "max_transfer_retries",
            Flag::new(
                "ingester.max-transfer-retries",
                &self.max_transfer_retries,
                "Number of times to try and transfer chunks before falling back to flushing.",
            ),
        )
    }
}

/// How queriers and distributors reach the ingesters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct IngesterClientConfig {
    /// gRPC connection to the ingesters.
    pub grpc_client_config: GrpcClientConfig,
    /// Timeout for ingester client RPCs.
    pub remote_timeout: Duration,
}

impl Default for IngesterClientConfig {
    fn default() -> Self {
        Self {
            grpc_client_config: GrpcClientConfig::default(),
            remote_timeout: Duration::from_secs(5),
        }
    }
}

impl IngesterClientConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        self.grpc_client_config.register_flags_with_prefix(
            "ingester.client",
            &mut flags.nested("grpc_client_config"),
        )?;
        flags.add(
            "remote_timeout",
            Flag::new(
                "ingester.client.timeout",
                &self.remote_timeout,
                "Timeout for ingester client RPCs.",
            ),
        )
    }
}

/// Query scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct QuerySchedulerConfig {
    /// Maximum number of outstanding requests per tenant per query-scheduler.
    pub max_outstanding_requests_per_tenant: u32,
    /// gRPC connection from the scheduler to the query-frontends.
    pub grpc_client_config: GrpcClientConfig,
    /// Use the scheduler ring for service discovery.
    pub use_scheduler_ring: bool,
}

impl Default for QuerySchedulerConfig {
    fn default() -> Self {
        Self {
            max_outstanding_requests_per_tenant: 32_000,
            grpc_client_config: GrpcClientConfig::default(),
            use_scheduler_ring: false,
        }
    }
}

impl QuerySchedulerConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        flags.add(
            "max_outstanding_requests_per_tenant",
            Flag::new(
                "query-scheduler.max-outstanding-requests-per-tenant",
                &self.max_outstanding_requests_per_tenant,
                "Maximum number of outstanding requests per tenant per query-scheduler.",
            )
            .advanced(),
        )?;
        self.grpc_client_config.register_flags_with_prefix(
            "query-scheduler.grpc-client-config",
            &mut flags.nested("grpc_client_config"),
        )?;
        flags.add(
            "use_scheduler_ring",
            Flag::new(
                "query-scheduler.use-scheduler-ring",
                &self.use_scheduler_ring,
                "Set to true to have the query schedulers create and place themselves in a ring.",
            ),
        )
    }
}

/// Gossip membership settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct MemberlistConfig {
    /// Name of the node in the memberlist cluster.
    pub node_name: String,
    /// Other cluster members to join.
    pub join_members: Vec<String>,
    /// Port to listen on for gossip messages.
    pub bind_port: u16,
}

impl Default for MemberlistConfig {
    fn default() -> Self {
        Self {
            node_name: String::new(),
            join_members: Vec::new(),
            bind_port: 7946,
        }
    }
}

impl MemberlistConfig {
    pub(crate) fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        flags.add(
            "node_name",
            Flag::new(
                "memberlist.nodename",
                &self.node_name,
                "Name of the node in memberlist cluster. Defaults to hostname.",
            ),
        )?;
        flags.add(
            "join_members",
            Flag::new(
                "memberlist.join",
                &self.join_members,
                "Other cluster members to join. Can be specified multiple times.",
            ),
        )?;
        flags.add(
            "bind_port",
            Flag::new(
                "memberlist.bind-port",
                &self.bind_port,
                "Port to listen on for gossip messages.",
            ),
        )
    }
}
