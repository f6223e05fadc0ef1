//! Error types for topology validation

use thiserror::Error;

/// Topology-related errors.
#[derive(Clone, Debug, Error)]
pub enum TopologyError {
    /// The topology is structurally invalid and must not be submitted.
    #[error("configuration error: {0}")]
    Configuration(String),
}
