//! Selection and catalog orchestration
//!
//! The controller is the single synchronization point: the catalog list,
//! the selected version, and the detail payload are only ever mutated
//! here, and every mutation happens inside one `watch::send_modify`
//! critical section so downstream readers only see consistent snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::error::CatalogError;
use crate::catalog::service::{CatalogService, SyncMeta};
use crate::sync::notification::{ChangeKind, ChangeNotification};
use crate::sync::state::StackState;
use crate::version::ordering::sort_versions;

/// Owns the synchronized state and arbitrates between user-driven
/// selection changes and server-driven invalidation.
pub struct SyncController<S> {
    service: Arc<S>,
    state_tx: watch::Sender<StackState>,
    /// Stamp handed to each catalog refresh at request start.
    refresh_stamp: AtomicU64,
    /// Stamp of the most recently applied refresh. Only read and written
    /// inside `send_modify`, which serializes all state mutation.
    applied_refresh: AtomicU64,
}

impl<S: CatalogService> SyncController<S> {
    pub fn new(service: Arc<S>) -> Self {
        let (state_tx, _) = watch::channel(StackState::default());
        Self {
            service,
            state_tx,
            refresh_stamp: AtomicU64::new(0),
            applied_refresh: AtomicU64::new(0),
        }
    }

    /// Returns a receiver observing every published state snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StackState> {
        self.state_tx.subscribe()
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> StackState {
        self.state_tx.borrow().clone()
    }

    /// Runs the first catalog refresh with the initial loading flag set,
    /// so the UI can distinguish "list still loading" from "list empty".
    pub async fn initial_load(&self) -> Result<(), CatalogError> {
        self.state_tx.send_modify(|state| state.is_loading = true);
        let result = self.refresh_versions().await;
        self.state_tx.send_modify(|state| state.is_loading = false);
        result
    }

    /// Fetches the full version list and atomically replaces the catalog.
    ///
    /// Identifiers are deduplicated and sorted newest first. Overlapping
    /// refreshes are last-write-wins: each call takes a monotonically
    /// increasing stamp at request start, and a completion older than the
    /// most recently applied one is discarded instead of clobbering it.
    /// On failure the previous catalog is retained and the error flag is
    /// raised. On the first successful refresh the newest version becomes
    /// the selection if none is set; an existing selection is never moved.
    pub async fn refresh_versions(&self) -> Result<(), CatalogError> {
        let stamp = self.refresh_stamp.fetch_add(1, Ordering::SeqCst) + 1;

        match self.service.list_versions().await {
            Ok(raw_versions) => {
                let mut applied = false;
                self.state_tx.send_modify(|state| {
                    if stamp <= self.applied_refresh.load(Ordering::SeqCst) {
                        debug!("Discarding stale catalog refresh (stamp {})", stamp);
                        return;
                    }
                    self.applied_refresh.store(stamp, Ordering::SeqCst);
                    applied = true;

                    let unique: IndexSet<String> = raw_versions.iter().cloned().collect();
                    let unique: Vec<String> = unique.into_iter().collect();
                    state.versions = sort_versions(&unique, true);
                    state.error = None;
                });

                if applied {
                    debug!("Catalog refreshed (stamp {})", stamp);
                    self.apply_default_selection().await;
                }

                Ok(())
            }
            Err(e) => {
                warn!("Failed to load versions: {}", e);
                self.state_tx
                    .send_modify(|state| state.error = Some("Failed to load versions".to_string()));
                Err(e)
            }
        }
    }

    /// Selects the newest version after a refresh when nothing is selected
    /// yet. An existing selection is sticky even if the refreshed catalog
    /// no longer contains it.
    async fn apply_default_selection(&self) {
        let newest = {
            let state = self.state_tx.borrow();
            if state.selected.is_some() {
                return;
            }
            state.newest_version().map(str::to_string)
        };

        if let Some(version) = newest {
            info!("Defaulting selection to newest version {}", version);
            self.set_selected_version(&version).await;
        }
    }

    /// Selects `version` and loads its detail document.
    ///
    /// The selection is recorded before the detail fetch starts, so the
    /// notification path always observes the latest selection rather than
    /// a value captured when the subscription was set up.
    pub async fn set_selected_version(&self, version: &str) {
        self.state_tx.send_modify(|state| {
            state.selected = Some(version.to_string());
            state.pending_update = None;
        });

        self.load_detail(version).await;
    }

    /// Re-loads the detail document for the current selection, pulling in
    /// any pending server-side update. Does nothing when no version is
    /// selected.
    pub async fn reload_selected(&self) {
        let selected = self.state_tx.borrow().selected.clone();
        if let Some(version) = selected {
            self.load_detail(&version).await;
        }
    }

    /// Dismisses the pending-update marker without reloading anything.
    pub fn clear_update_notification(&self) {
        self.state_tx.send_modify(|state| state.pending_update = None);
    }

    /// Reacts to one pushed change event.
    ///
    /// Structural changes (insert/delete) refresh the catalog. Content
    /// changes (update/replace) raise the pending-update marker when they
    /// hit the current selection, and also refresh the catalog because
    /// list-level metadata may have changed. Updates to non-selected
    /// versions are dropped, not queued. Handshake and unknown events are
    /// ignored.
    pub async fn handle_notification(&self, notification: ChangeNotification) {
        match notification.kind {
            ChangeKind::Connected | ChangeKind::Other => return,
            kind => {
                if kind.is_content() {
                    self.state_tx.send_modify(|state| {
                        if notification.version.is_some()
                            && notification.version == state.selected
                        {
                            state.pending_update = Some(notification.clone());
                        }
                    });
                }

                if let Err(e) = self.refresh_versions().await {
                    warn!("Catalog refresh after change notification failed: {}", e);
                }
            }
        }
    }

    /// Fetches the ingestion job's sync metadata record.
    pub async fn sync_meta(&self) -> Result<SyncMeta, CatalogError> {
        self.service.get_sync_meta().await
    }

    /// Loads the detail document for `version` and writes it back only if
    /// `version` is still the live selection.
    ///
    /// The write-back is keyed by the version the fetch was issued for: a
    /// late resolution for a deselected version is discarded so it can
    /// never overwrite state belonging to a newer selection. Failures are
    /// logged and the previous payload is kept; detail-load failures are
    /// not surfaced as user-facing errors.
    async fn load_detail(&self, version: &str) {
        self.state_tx.send_modify(|state| state.is_loading_detail = true);

        let result = self.service.get_version_detail(version).await;

        self.state_tx.send_modify(|state| {
            state.is_loading_detail = false;
            match result {
                Ok(detail) => {
                    if state.selected.as_deref() == Some(version) {
                        state.detail = Some(detail);
                        state.pending_update = None;
                    } else {
                        debug!("Discarding stale detail payload for {}", version);
                    }
                }
                Err(e) => {
                    warn!("Failed to load details for {}: {}", version, e);
                }
            }
        });
    }
}
