//! Configuration of a small log-aggregation stack.
//!
//! The ring, Consul and gRPC client settings are embedded by several
//! components, which is what the generated reference folds into a single
//! section per type.


pub mod components;
pub mod grpc;
pub mod ring;

use flagdoc::{ConfigSchema, FlagSet, FlagdocError, RegisterFlags, RootBlock};
use serde::{Deserialize, Serialize};

use crate::components::{
    DistributorConfig, IngesterClientConfig, IngesterConfig, MemberlistConfig,
    QuerySchedulerConfig, ServerConfig,
};

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ConfigSchema)]
#[serde(default)]
pub struct Config {
    /// Components to run.
    #[flagdoc(required)]
    pub target: Vec<String>,
    /// Enables authentication through the X-Scope-OrgID header.
    pub auth_enabled: bool,
    /// Server settings shared by every component.
    pub server: ServerConfig,
    /// Distributor settings.
    pub distributor: DistributorConfig,
    /// Ingester settings.
    pub ingester: IngesterConfig,
    /// Ingester client settings.
    pub ingester_client: IngesterClientConfig,
    /// Query scheduler settings.
    pub query_scheduler: QuerySchedulerConfig,
    /// Gossip membership settings.
    pub memberlist: MemberlistConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: vec!["all".to_owned()],
            auth_enabled: true,
            server: ServerConfig::default(),
            distributor: DistributorConfig::default(),
            ingester: IngesterConfig::default(),
            ingester_client: IngesterClientConfig::default(),
            query_scheduler: QuerySchedulerConfig::default(),
            memberlist: MemberlistConfig::default(),
        }
    }
}

impl RegisterFlags for Config {
    fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        flags.add(
            "target",
            flagdoc::Flag::new(
                "target",
                &self.target,
                "A comma-separated list of components to run.",
            ),
        )?;
        flags.add(
            "auth_enabled",
            flagdoc::Flag::new(
                "auth.enabled",
                &self.auth_enabled,
                "Enables authentication through the X-Scope-OrgID header, which must be present if true.",
            ),
        )?;
        self.server.register_flags(&mut flags.nested("server"))?;
        self.distributor
            .register_flags(&mut flags.nested("distributor"))?;
        self.ingester.register_flags(&mut flags.nested("ingester"))?;
        self.ingester_client
            .register_flags(&mut flags.nested("ingester_client"))?;
        self.query_scheduler
            .register_flags(&mut flags.nested("query_scheduler"))?;
        self.memberlist.register_flags(&mut flags.nested("memberlist"))
    }
}

/// Sections documented at the top level of the reference.
#[must_use]
pub fn root_blocks() -> Vec<RootBlock> {
    vec![
        RootBlock::of::<ServerConfig>(
            "server",
            "Configures the server of the launched module(s).",
        ),
        RootBlock::of::<DistributorConfig>("distributor", "Configures the distributor."),
        RootBlock::of::<IngesterConfig>(
            "ingester",
            "Configures the ingester and how the ingester will register itself to a key value store.",
        ),
        RootBlock::of::<IngesterClientConfig>(
            "ingester_client",
            "Configures how the distributor will connect to ingesters.",
        ),
        RootBlock::of::<QuerySchedulerConfig>(
            "query_scheduler",
            "Configures the query scheduler.",
        ),
        RootBlock::of::<ring::RingConfig>(
            "ring",
            "Configures a hash ring shared by a component's instances.",
        ),
        RootBlock::of::<ring::ConsulConfig>(
            "consul",
            "Configuration for a Consul client. Only applies if the selected kvstore is consul.",
        ),
        RootBlock::of::<grpc::GrpcClientConfig>(
            "grpc_client",
            "Configures the gRPC client used to communicate between two components.",
        ),
        RootBlock::of::<MemberlistConfig>(
            "memberlist",
            "Configures memberlist gossip between instances.",
        ),
    ]
}
