//! Member descriptor for a replica set topology

use serde::{Deserialize, Serialize};

/// One member of a replica set topology.
///
/// The id must be unique within a topology; host and port identify the
/// datastore process the replication engine should add to the group.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct NodeSpec {
    id: u32,
    host: String,
    port: u16,
}

impl NodeSpec {
    /// Create a new member descriptor.
    pub fn new(id: u32, host: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            host: host.into(),
            port,
        }
    }

    /// Get the member id of this node
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Get the host of this node
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port of this node
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// The `host:port` address the replication engine dials.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_joins_host_and_port() {
        let node = NodeSpec::new(0, "10.76.9.53", 27017);
        assert_eq!(node.address(), "10.76.9.53:27017");
    }

    #[test]
    fn serializes_member_descriptor_fields() {
        let node = NodeSpec::new(2, "db-2.internal", 27017);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["host"], "db-2.internal");
        assert_eq!(json["port"], 27017);
    }
}
