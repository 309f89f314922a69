use crate::sync::notification::ChangeNotification;

/// Immutable snapshot of the synchronized browser state.
///
/// Published through a `tokio::sync::watch` channel by the controller;
/// every snapshot is internally consistent, readers never observe a
/// half-applied update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackState {
    /// Known versions, deduplicated and sorted newest first.
    pub versions: Vec<String>,
    /// The version currently being viewed, if any.
    pub selected: Option<String>,
    /// Detail document bound to `selected`; kept at last-known-good when a
    /// reload fails.
    pub detail: Option<serde_json::Value>,
    /// True while the initial catalog load is in flight.
    pub is_loading: bool,
    /// True while a detail fetch is in flight.
    pub is_loading_detail: bool,
    /// Set when listing versions failed; cleared by the next successful
    /// refresh.
    pub error: Option<String>,
    /// Change event for `selected` whose data has not been pulled yet.
    /// Always refers to the currently selected version.
    pub pending_update: Option<ChangeNotification>,
}

impl StackState {
    /// True when the selected version's backing data changed server-side
    /// since it was last loaded.
    pub fn has_pending_update(&self) -> bool {
        self.pending_update.is_some()
    }

    /// The newest known version, if the catalog is non-empty.
    pub fn newest_version(&self) -> Option<&str> {
        self.versions.first().map(String::as_str)
    }
}
