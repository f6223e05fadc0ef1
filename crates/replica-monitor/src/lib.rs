//! Queries and aggregates replica set status for Photon datastore
//! clusters.
//!
//! This crate provides:
//! - [`ReplicaMonitor`], an HTTP client for the datastore's status
//!   endpoint
//! - The wire types for one status snapshot ([`ReplicaSetStatus`],
//!   [`MemberStatus`], [`MemberState`])
//! - Pure health aggregation ([`health`])
//! - [`StatusPoller`], the fixed-interval polling service behind the
//!   status page
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
pub mod health;
mod poller;
mod serde_ping;
mod types;

pub use error::{Error, Result};
pub use health::HealthSummary;
pub use poller::{PollerConfig, StatusPoller, StatusPresenter, StatusView};
pub use types::{HEALTHY, MemberState, MemberStatus, ReplicaSetStatus};

use reqwest::Client;
use tracing::debug;
use url::Url;

use types::StatusPayload;

/// Client for the datastore's replica set status endpoint.
#[derive(Clone, Debug)]
pub struct ReplicaMonitor {
    client: Client,
    status_url: Url,
}

impl ReplicaMonitor {
    /// Creates a new `ReplicaMonitor` querying the given status endpoint.
    #[must_use]
    pub fn new(status_url: Url) -> Self {
        Self {
            client: Client::new(),
            status_url,
        }
    }

    /// Fetches one replica set status snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or a non-success HTTP
    /// response, [`Error::Json`] if the body cannot be parsed, and
    /// [`Error::Application`] if the payload marks itself unsuccessful.
    pub async fn fetch_status(&self) -> Result<ReplicaSetStatus> {
        let response = self
            .client
            .get(self.status_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let json = response.text().await?;
        debug!("raw replica set status: {}", json);

        let payload: StatusPayload = serde_json::from_str(&json)?;
        if !payload.success {
            return Err(Error::Application(payload.error.unwrap_or_else(|| {
                "status endpoint reported failure".to_string()
            })));
        }

        Ok(ReplicaSetStatus {
            replica_set_name: payload.replica_set_name.unwrap_or_default(),
            members: payload.members,
        })
    }
}
