//! The catalog service boundary
//!
//! The document store behind the documentation server is an external
//! collaborator; this crate only ever sees it through the
//! [`service::CatalogService`] trait. [`http::HttpCatalogService`] is the
//! production implementation over the server's REST endpoints, and
//! [`pool`] memoizes one service instance per target database for the life
//! of the process.
//!
//! # Modules
//!
//! - [`error`]: error types for catalog operations
//! - [`service`]: the `CatalogService` trait and the `SyncMeta` record
//! - [`http`]: reqwest-based implementation
//! - [`pool`]: process-wide service registry keyed by database name

pub mod error;
pub mod http;
pub mod pool;
pub mod service;
