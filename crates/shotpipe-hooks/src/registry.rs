//! Publish registration
//!
//! The registration service is an external collaborator: it receives a
//! finalized publish path, display name, version number and dependency
//! list, and hands back an opaque record identifier. The hook layer's
//! only obligation is to supply well-formed values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

/// Opaque identifier of a published record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublishedId(pub String);

impl From<String> for PublishedId {
    fn from(s: String) -> Self {
        PublishedId(s)
    }
}

impl From<&str> for PublishedId {
    fn from(s: &str) -> Self {
        PublishedId(s.to_string())
    }
}

impl AsRef<str> for PublishedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything the registration service needs for one publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Finalized publish path
    pub path: String,

    /// Versionless display name
    pub name: String,

    /// Version number of this publish
    pub version: i64,

    /// Published file type configured for the output
    pub published_file_type: String,

    /// User-provided publish comment
    pub comment: String,

    /// Optional thumbnail to attach
    pub thumbnail_path: Option<String>,

    /// Paths this publish depends on
    pub dependency_paths: Vec<String>,
}

/// A registered publish as stored by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedRecord {
    pub id: PublishedId,

    #[serde(flatten)]
    pub request: PublishRequest,

    /// When the publish was registered
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// Registration API surface
#[async_trait]
pub trait PublishRegistry: Send + Sync {
    /// Register a finalized publish, returning its record identifier
    async fn register(&self, request: PublishRequest) -> Result<PublishedId>;
}

/// In-memory registry for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: RwLock<Vec<PublishedRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything registered so far
    pub async fn records(&self) -> Vec<PublishedRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl PublishRegistry for MemoryRegistry {
    async fn register(&self, request: PublishRequest) -> Result<PublishedId> {
        let id = PublishedId(Uuid::new_v4().to_string());
        let record = PublishedRecord {
            id: id.clone(),
            request,
            registered_at: OffsetDateTime::now_utc(),
        };
        self.records.write().await.push(record);
        Ok(id)
    }
}
