//! One-shot replica set bootstrap for Photon datastore clusters.
//!
//! At cluster startup this crate:
//! 1. validates and submits the replica set topology to the datastore's
//!    administrative interface,
//! 2. waits, within a bounded attempt budget, for a leader election,
//! 3. idempotently ensures the application's collection and indexes.
//!
//! Every stage after structural validation is best-effort and
//! independent: failures are logged and the sequence proceeds.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod admin;
mod error;

pub use admin::{HttpReplicaSetAdmin, IndexOrder, IndexSpec, ReplicaSetAdmin, SchemaSpec};
pub use error::{Error, Result};

use std::sync::Mutex;
use std::time::Duration;

use photon_replica_monitor::health;
use photon_topology::ClusterTopology;
use tracing::{debug, error, info, warn};

/// Attempt budget for the leader wait; with the default interval this
/// covers the engine's usual election time.
const LEADER_WAIT_ATTEMPTS: u32 = 30;

/// Suspension between leader wait attempts.
const LEADER_WAIT_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for the bootstrap sequence
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Maximum status queries before giving up on the election
    pub max_attempts: u32,
    /// Suspension between status queries
    pub leader_interval: Duration,
    /// Application schema ensured once the election settles
    pub schema: SchemaSpec,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_attempts: LEADER_WAIT_ATTEMPTS,
            leader_interval: LEADER_WAIT_INTERVAL,
            schema: SchemaSpec::default(),
        }
    }
}

/// Stages of the bootstrap sequence. Both election outcomes proceed to
/// schema setup; `SchemaReady` is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BootstrapStage {
    /// Nothing submitted yet.
    Init,
    /// Topology submitted, polling for a primary.
    WaitingForLeader,
    /// A member reported PRIMARY within the attempt budget.
    Elected,
    /// Attempt budget exhausted without a primary.
    Unelected,
    /// Schema setup attempted; bootstrap finished.
    SchemaReady,
}

/// Outcome of the bounded leader wait. `NoLeader` is an expected,
/// non-fatal result, not an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Election {
    /// The named member reported PRIMARY.
    Elected(String),
    /// No member reported PRIMARY within the attempt budget.
    NoLeader,
}

/// What the bootstrap sequence achieved.
#[derive(Clone, Debug)]
pub struct BootstrapReport {
    /// Result of the leader wait.
    pub election: Election,
    /// Whether schema setup succeeded.
    pub schema_ready: bool,
}

/// Drives the bootstrap sequence against a [`ReplicaSetAdmin`].
pub struct Bootstrapper<A: ReplicaSetAdmin> {
    admin: A,
    config: BootstrapConfig,
    stage: Mutex<BootstrapStage>,
}

impl<A: ReplicaSetAdmin> Bootstrapper<A> {
    /// Create a bootstrapper with default configuration.
    pub fn new(admin: A) -> Self {
        Self::with_config(admin, BootstrapConfig::default())
    }

    /// Create a bootstrapper with custom configuration.
    pub fn with_config(admin: A, config: BootstrapConfig) -> Self {
        Self {
            admin,
            config,
            stage: Mutex::new(BootstrapStage::Init),
        }
    }

    /// The stage the sequence has reached.
    pub fn stage(&self) -> BootstrapStage {
        *self.stage.lock().unwrap()
    }

    fn set_stage(&self, stage: BootstrapStage) {
        info!("bootstrap stage: {:?}", stage);
        *self.stage.lock().unwrap() = stage;
    }

    /// Run the full bootstrap sequence: initiate, wait for a leader,
    /// ensure the application schema.
    ///
    /// # Errors
    ///
    /// Only a structurally invalid topology ([`Error::Configuration`])
    /// aborts the sequence; every later stage failure is logged and the
    /// sequence continues.
    pub async fn run(&self, topology: &ClusterTopology) -> Result<BootstrapReport> {
        self.initiate(topology).await?;

        self.set_stage(BootstrapStage::WaitingForLeader);
        let election = self.wait_for_leader().await;
        match &election {
            Election::Elected(name) => {
                info!("primary elected: {}", name);
                self.set_stage(BootstrapStage::Elected);
            }
            Election::NoLeader => {
                warn!(
                    "no primary elected after {} attempts, continuing without a leader",
                    self.config.max_attempts
                );
                self.set_stage(BootstrapStage::Unelected);
            }
        }

        // Schema setup must never block cluster availability.
        let schema_ready = match self.ensure_schema().await {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        };
        self.set_stage(BootstrapStage::SchemaReady);

        Ok(BootstrapReport {
            election,
            schema_ready,
        })
    }

    /// Validate and submit the topology.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a structurally invalid
    /// topology. Rejection by the engine (typically a group that is
    /// already initiated) is an external condition: logged, not fatal.
    pub async fn initiate(&self, topology: &ClusterTopology) -> Result<()> {
        topology.validate()?;
        match self.admin.initiate(topology).await {
            Ok(()) => info!(
                "replica set '{}' initiated with {} members",
                topology.replica_set(),
                topology.members().len()
            ),
            Err(e) => warn!("replica set initiation not acknowledged: {}", e),
        }
        Ok(())
    }

    /// Query status until a member reports PRIMARY, up to the configured
    /// attempt budget.
    ///
    /// Exactly `max_attempts` queries are issued when no leader appears;
    /// query failures consume attempts like any other. Each wait between
    /// attempts is a yield point, never a blocking sleep.
    pub async fn wait_for_leader(&self) -> Election {
        for attempt in 1..=self.config.max_attempts {
            match self.admin.status().await {
                Ok(status) => {
                    if let Some(primary) = health::summarize(&status.members).primary {
                        debug!(
                            "found primary on attempt {}/{}",
                            attempt, self.config.max_attempts
                        );
                        return Election::Elected(primary);
                    }
                    debug!(
                        "waiting for primary election... {}/{}",
                        attempt, self.config.max_attempts
                    );
                }
                Err(e) => debug!(
                    "status query failed while waiting for primary ({}/{}): {}",
                    attempt, self.config.max_attempts, e
                ),
            }
            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.leader_interval).await;
            }
        }
        Election::NoLeader
    }

    /// Idempotently ensure the application schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`]. [`Bootstrapper::run`] logs and swallows
    /// it; schema setup is best-effort by design.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.admin
            .ensure_schema(&self.config.schema)
            .await
            .map_err(|e| Error::Schema(e.to_string()))?;
        info!(
            "application schema ready: collection '{}' with {} indexes",
            self.config.schema.collection,
            self.config.schema.indexes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use photon_replica_monitor::{MemberState, MemberStatus, ReplicaSetStatus};
    use photon_topology::NodeSpec;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn member(name: &str, state: MemberState) -> MemberStatus {
        MemberStatus {
            name: name.to_string(),
            state,
            health: "Healthy".to_string(),
            uptime: Some(120),
            ping_ms: Some(1.0),
        }
    }

    /// Scripted admin fake: a primary appears on the nth status query.
    #[derive(Default)]
    struct MockAdmin {
        primary_after: Option<u32>,
        fail_initiate: bool,
        fail_status: bool,
        fail_schema: bool,
        initiate_calls: AtomicU32,
        status_calls: AtomicU32,
        schema_calls: AtomicU32,
    }

    #[async_trait]
    impl ReplicaSetAdmin for MockAdmin {
        async fn initiate(&self, _topology: &ClusterTopology) -> Result<()> {
            self.initiate_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_initiate {
                return Err(Error::Rejected("already initialized".to_string()));
            }
            Ok(())
        }

        async fn status(&self) -> Result<ReplicaSetStatus> {
            let call = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_status {
                return Err(Error::Rejected("engine unreachable".to_string()));
            }

            let elected = self.primary_after.is_some_and(|n| call >= n);
            let members = vec![
                if elected {
                    member("10.0.0.1:27017", MemberState::Primary)
                } else {
                    member("10.0.0.1:27017", MemberState::Startup2)
                },
                member("10.0.0.2:27017", MemberState::Secondary),
            ];
            Ok(ReplicaSetStatus {
                replica_set_name: "rsUpload".to_string(),
                members,
            })
        }

        async fn ensure_schema(&self, _schema: &SchemaSpec) -> Result<()> {
            self.schema_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_schema {
                return Err(Error::Rejected("index creation failed".to_string()));
            }
            Ok(())
        }
    }

    fn topology() -> ClusterTopology {
        ClusterTopology::new(
            "rsUpload",
            vec![
                NodeSpec::new(0, "10.0.0.1", 27017),
                NodeSpec::new(1, "10.0.0.2", 27017),
            ],
        )
    }

    fn fast_config(max_attempts: u32) -> BootstrapConfig {
        BootstrapConfig {
            max_attempts,
            leader_interval: Duration::ZERO,
            schema: SchemaSpec::default(),
        }
    }

    #[tokio::test]
    async fn elects_leader_as_soon_as_one_appears() {
        let admin = MockAdmin {
            primary_after: Some(3),
            ..MockAdmin::default()
        };
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(30));

        let report = bootstrapper.run(&topology()).await.unwrap();

        assert_eq!(
            report.election,
            Election::Elected("10.0.0.1:27017".to_string())
        );
        assert_eq!(bootstrapper.admin.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(bootstrapper.stage(), BootstrapStage::SchemaReady);
        assert!(report.schema_ready);
    }

    #[tokio::test]
    async fn exhausts_exactly_max_attempts_without_leader() {
        let admin = MockAdmin::default();
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(7));

        let report = bootstrapper.run(&topology()).await.unwrap();

        assert_eq!(report.election, Election::NoLeader);
        assert_eq!(bootstrapper.admin.status_calls.load(Ordering::SeqCst), 7);
        // Schema setup still runs after a failed election.
        assert_eq!(bootstrapper.admin.schema_calls.load(Ordering::SeqCst), 1);
        assert_eq!(bootstrapper.stage(), BootstrapStage::SchemaReady);
    }

    #[tokio::test]
    async fn status_errors_consume_attempts() {
        let admin = MockAdmin {
            fail_status: true,
            ..MockAdmin::default()
        };
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(5));

        let report = bootstrapper.run(&topology()).await.unwrap();

        assert_eq!(report.election, Election::NoLeader);
        assert_eq!(bootstrapper.admin.status_calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn invalid_topology_aborts_before_any_side_effect() {
        let admin = MockAdmin::default();
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(5));
        let empty = ClusterTopology::new("rsUpload", vec![]);

        let err = bootstrapper.run(&empty).await.unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(bootstrapper.admin.initiate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(bootstrapper.admin.schema_calls.load(Ordering::SeqCst), 0);
        assert_eq!(bootstrapper.stage(), BootstrapStage::Init);
    }

    #[tokio::test]
    async fn rejected_initiation_does_not_halt_the_sequence() {
        let admin = MockAdmin {
            fail_initiate: true,
            primary_after: Some(1),
            ..MockAdmin::default()
        };
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(5));

        let report = bootstrapper.run(&topology()).await.unwrap();

        assert!(matches!(report.election, Election::Elected(_)));
        assert_eq!(bootstrapper.stage(), BootstrapStage::SchemaReady);
    }

    #[tokio::test]
    async fn schema_failure_is_swallowed() {
        let admin = MockAdmin {
            primary_after: Some(1),
            fail_schema: true,
            ..MockAdmin::default()
        };
        let bootstrapper = Bootstrapper::with_config(admin, fast_config(5));

        let report = bootstrapper.run(&topology()).await.unwrap();

        assert!(!report.schema_ready);
        assert_eq!(bootstrapper.stage(), BootstrapStage::SchemaReady);
    }
}
