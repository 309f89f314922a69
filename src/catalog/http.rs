//! HTTP implementation of the catalog service

use std::time::Duration;

use tracing::warn;

use crate::catalog::error::CatalogError;
use crate::catalog::service::{CatalogService, SyncMeta};
use crate::config::REQUEST_TIMEOUT_SECS;

/// Path listing all version identifiers
const VERSIONS_PATH: &str = "/api/tech-stack/versions";

/// Path of the ingestion job's sync metadata record
const META_PATH: &str = "/api/tech-stack/meta";

/// Path of the server-pushed change feed
const WATCH_PATH: &str = "/api/tech-stack/watch";

/// Header naming the target database on every request
const DATABASE_HEADER: &str = "x-docs-db";

/// Catalog service over the documentation server's REST endpoints
pub struct HttpCatalogService {
    client: reqwest::Client,
    base_url: String,
    database: String,
}

impl HttpCatalogService {
    /// Creates a new service against `base_url`, scoped to `database`.
    pub fn new(base_url: &str, database: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("stacksync")
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            database: database.to_string(),
        }
    }

    /// URL of the server-pushed change feed for this database.
    pub fn watch_url(&self) -> String {
        format!("{}{}", self.base_url, WATCH_PATH)
    }

    /// Name of the database this service is scoped to.
    pub fn database(&self) -> &str {
        &self.database
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header(DATABASE_HEADER, &self.database)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            warn!("Catalog server returned status {}: {}", status, url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse catalog response from {}: {}", url, e);
            CatalogError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl CatalogService for HttpCatalogService {
    async fn list_versions(&self) -> Result<Vec<String>, CatalogError> {
        self.get_json(VERSIONS_PATH).await
    }

    async fn get_version_detail(&self, version: &str) -> Result<serde_json::Value, CatalogError> {
        let path = format!("{}/{}", VERSIONS_PATH, version);
        self.get_json::<serde_json::Value>(&path)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(_) => CatalogError::NotFound(version.to_string()),
                other => other,
            })
    }

    async fn get_sync_meta(&self) -> Result<SyncMeta, CatalogError> {
        self.get_json(META_PATH).await
    }
}
