//! Replica set topology model for Photon datastore clusters.
//!
//! This crate provides:
//! - Member descriptor types ([`NodeSpec`])
//! - The immutable [`ClusterTopology`] submitted at cluster bootstrap
//! - Structural validation (empty topologies, duplicate member ids)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod node;

pub use error::TopologyError;
pub use node::NodeSpec;

use std::collections::HashSet;

use serde::Serialize;

/// An ordered replica set topology.
///
/// Constructed once at process start and never mutated; the bootstrap
/// sequence owns it and submits it to the datastore's administrative
/// interface verbatim.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct ClusterTopology {
    replica_set: String,
    members: Vec<NodeSpec>,
}

impl ClusterTopology {
    /// Create a topology for the named replica set.
    pub fn new(replica_set: impl Into<String>, members: Vec<NodeSpec>) -> Self {
        Self {
            replica_set: replica_set.into(),
            members,
        }
    }

    /// Get the replica set name
    pub fn replica_set(&self) -> &str {
        &self.replica_set
    }

    /// Get the ordered member descriptors
    pub fn members(&self) -> &[NodeSpec] {
        &self.members
    }

    /// Check the topology is safe to submit to the replication engine.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Configuration`] if the member list is empty
    /// or two members share an id.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.members.is_empty() {
            return Err(TopologyError::Configuration(format!(
                "replica set '{}' has no members",
                self.replica_set
            )));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id()) {
                return Err(TopologyError::Configuration(format!(
                    "duplicate member id {} in replica set '{}'",
                    member.id(),
                    self.replica_set
                )));
            }
        }

        Ok(())
    }
}
