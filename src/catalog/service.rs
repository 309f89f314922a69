//! Service trait for the external version catalog

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::catalog::error::CatalogError;

/// Bookkeeping record maintained by the external ingestion job.
///
/// Read-only from this crate's perspective; the UI shows it as
/// "last synced at".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncMeta {
    pub key: String,
    pub last_sync_commit_id: String,
    pub last_sync_timestamp: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Trait for reading the version catalog backing the documentation browser
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches all known version identifiers, unordered and possibly
    /// containing duplicates.
    async fn list_versions(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetches the detail document bound to one version.
    ///
    /// # Returns
    /// * `Ok(value)` - The full document; replaced wholesale by callers, never merged
    /// * `Err(CatalogError::NotFound)` - If the version no longer exists
    async fn get_version_detail(&self, version: &str) -> Result<serde_json::Value, CatalogError>;

    /// Fetches the ingestion job's sync metadata record.
    async fn get_sync_meta(&self) -> Result<SyncMeta, CatalogError>;
}
