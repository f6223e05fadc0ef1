//! Administrative interface seam for the replication engine.

use async_trait::async_trait;
use photon_replica_monitor::{ReplicaMonitor, ReplicaSetStatus};
use photon_topology::ClusterTopology;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Sort order of a schema index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOrder {
    /// Ascending key order.
    Ascending,
    /// Descending key order.
    Descending,
}

/// One index the application expects on its collection.
#[derive(Clone, Debug, Serialize)]
pub struct IndexSpec {
    /// Document field the index covers.
    pub field: String,
    /// Key order.
    pub order: IndexOrder,
}

impl IndexSpec {
    /// Create an index specification.
    pub fn new(field: impl Into<String>, order: IndexOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// The application collection and index set ensured at bootstrap.
/// Creation is idempotent on the engine side.
#[derive(Clone, Debug, Serialize)]
pub struct SchemaSpec {
    /// Collection name.
    pub collection: String,
    /// Indexes created if absent.
    pub indexes: Vec<IndexSpec>,
}

impl Default for SchemaSpec {
    /// Upload metadata schema: newest-first listing plus owner and tag
    /// lookups.
    fn default() -> Self {
        Self {
            collection: "files".to_string(),
            indexes: vec![
                IndexSpec::new("upload_date", IndexOrder::Descending),
                IndexSpec::new("owner", IndexOrder::Ascending),
                IndexSpec::new("tags", IndexOrder::Ascending),
            ],
        }
    }
}

/// Interface to the datastore's replica set administration.
#[async_trait]
pub trait ReplicaSetAdmin: Send + Sync {
    /// Submit a topology to establish the replication group. Establishing
    /// the group is an external, irreversible action.
    async fn initiate(&self, topology: &ClusterTopology) -> Result<()>;

    /// Query current replica set status.
    async fn status(&self) -> Result<ReplicaSetStatus>;

    /// Idempotently create the application collection and indexes.
    async fn ensure_schema(&self, schema: &SchemaSpec) -> Result<()>;
}

/// Acknowledgement envelope returned by administrative endpoints.
#[derive(Debug, Deserialize)]
struct AdminAck {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl AdminAck {
    fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Rejected(self.error.unwrap_or_else(|| {
                "administrative command failed".to_string()
            })))
        }
    }
}

/// JSON-over-HTTP implementation of [`ReplicaSetAdmin`].
#[derive(Clone, Debug)]
pub struct HttpReplicaSetAdmin {
    client: Client,
    initiate_url: Url,
    schema_url: Url,
    monitor: ReplicaMonitor,
}

impl HttpReplicaSetAdmin {
    /// Build an administrative client from the API base URL, e.g.
    /// `http://localhost:5000/api/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the endpoint paths cannot be joined onto
    /// the base URL.
    pub fn new(base_url: &Url) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            initiate_url: base_url.join("replicaset/initiate")?,
            schema_url: base_url.join("schema/ensure")?,
            monitor: ReplicaMonitor::new(base_url.join("replicaset/status")?),
        })
    }
}

#[async_trait]
impl ReplicaSetAdmin for HttpReplicaSetAdmin {
    async fn initiate(&self, topology: &ClusterTopology) -> Result<()> {
        debug!(
            "submitting topology for replica set '{}'",
            topology.replica_set()
        );
        let ack: AdminAck = self
            .client
            .post(self.initiate_url.clone())
            .json(topology)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        ack.into_result()
    }

    async fn status(&self) -> Result<ReplicaSetStatus> {
        Ok(self.monitor.fetch_status().await?)
    }

    async fn ensure_schema(&self, schema: &SchemaSpec) -> Result<()> {
        debug!(
            "ensuring collection '{}' and {} indexes",
            schema.collection,
            schema.indexes.len()
        );
        let ack: AdminAck = self
            .client
            .post(self.schema_url.clone())
            .json(schema)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        ack.into_result()
    }
}
