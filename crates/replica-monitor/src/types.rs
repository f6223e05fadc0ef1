//! Wire types for the replica set status endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::serde_ping;

/// The engine's sentinel value for a reachable, consistent member. Every
/// other health value counts as unhealthy.
pub const HEALTHY: &str = "Healthy";

/// Replication role / lifecycle state reported for one member.
///
/// The mapping from raw state strings is total: a state this crate does
/// not recognize is carried through unchanged in [`MemberState::Other`],
/// so a newer engine never breaks status handling.
#[allow(missing_docs)]
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(from = "String", into = "String")]
pub enum MemberState {
    Primary,
    Secondary,
    Arbiter,
    Recovering,
    Startup,
    Startup2,
    Unknown,
    Down,
    Rollback,
    Removed,
    Unreachable,
    Other(String),
}

impl From<String> for MemberState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PRIMARY" => Self::Primary,
            "SECONDARY" => Self::Secondary,
            "ARBITER" => Self::Arbiter,
            "RECOVERING" => Self::Recovering,
            "STARTUP" => Self::Startup,
            "STARTUP2" => Self::Startup2,
            "UNKNOWN" => Self::Unknown,
            "DOWN" => Self::Down,
            "ROLLBACK" => Self::Rollback,
            "REMOVED" => Self::Removed,
            "(not reachable/healthy)" => Self::Unreachable,
            _ => Self::Other(raw),
        }
    }
}

impl From<MemberState> for String {
    fn from(state: MemberState) -> Self {
        state.as_str().to_string()
    }
}

impl MemberState {
    /// The raw state string as the engine reports it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
            Self::Arbiter => "ARBITER",
            Self::Recovering => "RECOVERING",
            Self::Startup => "STARTUP",
            Self::Startup2 => "STARTUP2",
            Self::Unknown => "UNKNOWN",
            Self::Down => "DOWN",
            Self::Rollback => "ROLLBACK",
            Self::Removed => "REMOVED",
            Self::Unreachable => "(not reachable/healthy)",
            Self::Other(raw) => raw,
        }
    }

    /// Display classification for the state. Unrecognized states pass
    /// through unchanged rather than collapsing into a catch-all.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Arbiter => "Arbiter",
            Self::Recovering => "Recovering",
            Self::Startup | Self::Startup2 => "Starting up",
            Self::Unknown => "Unknown",
            Self::Down => "Down",
            Self::Rollback => "Rolling back",
            Self::Removed => "Removed",
            Self::Unreachable => "Unreachable",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this member reports itself as the elected leader.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single replica set member at one point in time.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberStatus {
    /// Member name (`host:port`).
    pub name: String,
    /// Replication state.
    pub state: MemberState,
    /// Raw health indicator; [`HEALTHY`] is the only healthy value.
    #[serde(default)]
    pub health: String,
    /// Member uptime in whole seconds, if reported.
    #[serde(default)]
    pub uptime: Option<u64>,
    /// Round-trip ping in milliseconds; only meaningful for healthy
    /// members.
    #[serde(rename = "pingMs", default, with = "serde_ping")]
    pub ping_ms: Option<f64>,
}

impl MemberStatus {
    /// True iff the member reports the engine's healthy sentinel.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.health == HEALTHY
    }
}

/// One complete, immutable snapshot of the replica set. Superseded
/// wholesale by the next poll; no history is retained.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReplicaSetStatus {
    /// Name of the replica set.
    pub replica_set_name: String,
    /// Member statuses in the order the engine reported them.
    pub members: Vec<MemberStatus>,
}

/// Raw envelope returned by the status endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusPayload {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub replica_set_name: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberStatus>,
}
