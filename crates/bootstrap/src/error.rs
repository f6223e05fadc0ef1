use thiserror::Error;

/// Convenience alias for bootstrap results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during cluster bootstrap.
#[derive(Debug, Error)]
pub enum Error {
    /// Structurally invalid topology; the only error fatal to bootstrap.
    #[error(transparent)]
    Configuration(#[from] photon_topology::TopologyError),

    /// Administrative request failed at the transport level.
    #[error("administrative request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The administrative interface rejected a command.
    #[error("administrative command rejected: {0}")]
    Rejected(String),

    /// A status query failed while waiting for the leader.
    #[error(transparent)]
    Monitor(#[from] photon_replica_monitor::Error),

    /// Application schema setup failed; logged by the bootstrap sequence,
    /// never fatal.
    #[error("schema setup failed: {0}")]
    Schema(String),

    /// Administrative endpoint URL could not be constructed.
    #[error("invalid administrative url: {0}")]
    Url(#[from] url::ParseError),
}
