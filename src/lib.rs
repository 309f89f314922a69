//! Live version-synchronization client for tech stack documentation
//!
//! The documentation server holds one structured document per released
//! version of the tracked tech stack. An external ingestion job rewrites
//! those documents out-of-band, and open sessions must pick the changes up
//! without polling. This crate keeps a local, ordered view of the version
//! catalog in sync with the server:
//!
//! - [`version`]: pure ordering over dot/dash-delimited version strings
//! - [`catalog`]: the HTTP boundary to the catalog service, plus the
//!   process-wide service registry
//! - [`sync`]: the synchronization core: state snapshots, the selection
//!   controller, and the supervised change-feed subscriber
//! - [`config`]: constants, configuration, and data/log directories

pub mod catalog;
pub mod config;
pub mod sync;
pub mod version;
