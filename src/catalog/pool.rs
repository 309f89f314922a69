//! Process-wide catalog service registry
//!
//! One [`HttpCatalogService`] exists per target database for the life of
//! the process: lazily created on first use, memoized by database name,
//! and dropped only at process exit. Callers share the instance (and its
//! connection pool) instead of constructing their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::catalog::http::HttpCatalogService;

static SERVICES: OnceLock<Mutex<HashMap<String, Arc<HttpCatalogService>>>> = OnceLock::new();

/// Returns the memoized catalog service for `database`, creating it
/// against `base_url` on first use.
///
/// The same database name always yields the same instance; a later call
/// with a different `base_url` still returns the instance created first.
pub fn catalog_for(base_url: &str, database: &str) -> Arc<HttpCatalogService> {
    let services = SERVICES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut services = services.lock().unwrap_or_else(PoisonError::into_inner);

    services
        .entry(database.to_string())
        .or_insert_with(|| {
            debug!("Creating catalog service for database {}", database);
            Arc::new(HttpCatalogService::new(base_url, database))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // The registry is shared process state, so these run serially.

    #[test]
    #[serial]
    fn catalog_for_returns_same_instance_for_same_database() {
        let first = catalog_for("http://localhost:3000", "pool_test_docs");
        let second = catalog_for("http://localhost:3000", "pool_test_docs");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[serial]
    fn catalog_for_separates_instances_by_database() {
        let docs = catalog_for("http://localhost:3000", "pool_test_docs");
        let users = catalog_for("http://localhost:3000", "pool_test_users");

        assert!(!Arc::ptr_eq(&docs, &users));
        assert_eq!(docs.database(), "pool_test_docs");
        assert_eq!(users.database(), "pool_test_users");
    }

    #[test]
    #[serial]
    fn catalog_for_ignores_base_url_on_memoized_key() {
        let first = catalog_for("http://localhost:3000", "pool_test_sticky");
        let second = catalog_for("http://other:9999", "pool_test_sticky");

        assert!(Arc::ptr_eq(&first, &second));
    }
}
