//! Live synchronization core
//!
//! Keeps the local view of the version catalog consistent with a server
//! whose data is rewritten out-of-band by an ingestion job.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  events   ┌──────────────────┐  snapshots  ┌──────────┐
//! │  Subscriber  │──────────▶│  SyncController  │────────────▶│ watchers │
//! │ (change feed)│           │ (selection/state)│             │   (UI)   │
//! └──────────────┘           └──────────────────┘             └──────────┘
//!                                     │
//!                                     ▼
//!                            ┌──────────────────┐
//!                            │  CatalogService  │
//!                            │ (list / detail)  │
//!                            └──────────────────┘
//! ```
//!
//! All mutation flows through the controller; everything downstream reads
//! immutable [`state::StackState`] snapshots from a watch channel.
//!
//! # Modules
//!
//! - [`state`]: the published state snapshot
//! - [`notification`]: wire types for pushed change events
//! - [`controller`]: selection, catalog refresh, and detail loading with
//!   stale-completion guards
//! - [`subscriber`]: the supervised long-lived change-feed connection

pub mod controller;
pub mod notification;
pub mod state;
pub mod subscriber;
