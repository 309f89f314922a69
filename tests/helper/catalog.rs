//! Catalog test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use stacksync::catalog::error::CatalogError;
use stacksync::catalog::service::{CatalogService, SyncMeta};

/// In-memory catalog for testing; versions can be swapped mid-test to
/// simulate the external ingestion job rewriting the collection.
pub struct MemoryCatalog {
    versions: Mutex<Vec<String>>,
    details: Mutex<HashMap<String, serde_json::Value>>,
    fail_listing: Mutex<bool>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            versions: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
            fail_listing: Mutex::new(false),
        }
    }

    pub fn with_versions(self, versions: Vec<&str>) -> Self {
        {
            let mut stored = self.versions.lock().unwrap();
            *stored = versions.iter().map(|v| v.to_string()).collect();
            let mut details = self.details.lock().unwrap();
            for version in versions {
                details.insert(
                    version.to_string(),
                    serde_json::json!({ "version": version }),
                );
            }
        }
        self
    }

    /// Replaces the stored version list, as the ingestion job would.
    pub fn replace_versions(&self, versions: Vec<&str>) {
        let mut stored = self.versions.lock().unwrap();
        *stored = versions.iter().map(|v| v.to_string()).collect();
        let mut details = self.details.lock().unwrap();
        for version in versions {
            details
                .entry(version.to_string())
                .or_insert_with(|| serde_json::json!({ "version": version }));
        }
    }

    /// Rewrites one version's document in place, as the ingestion job would.
    pub fn set_detail(&self, version: &str, detail: serde_json::Value) {
        self.details.lock().unwrap().insert(version.to_string(), detail);
    }

    /// Makes every subsequent listing fail with an invalid response.
    pub fn set_fail_listing(&self, fail: bool) {
        *self.fail_listing.lock().unwrap() = fail;
    }
}

#[async_trait]
impl CatalogService for MemoryCatalog {
    async fn list_versions(&self) -> Result<Vec<String>, CatalogError> {
        if *self.fail_listing.lock().unwrap() {
            return Err(CatalogError::InvalidResponse("listing disabled".to_string()));
        }
        Ok(self.versions.lock().unwrap().clone())
    }

    async fn get_version_detail(&self, version: &str) -> Result<serde_json::Value, CatalogError> {
        self.details
            .lock()
            .unwrap()
            .get(version)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(version.to_string()))
    }

    async fn get_sync_meta(&self) -> Result<SyncMeta, CatalogError> {
        Ok(SyncMeta {
            key: "tech-stack-sync".to_string(),
            last_sync_commit_id: "a1b2c3d".to_string(),
            last_sync_timestamp: Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 5).unwrap(),
        })
    }
}
