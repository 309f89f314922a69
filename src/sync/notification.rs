//! Wire types for the server-pushed change feed

use serde::Deserialize;
use tracing::warn;

/// Classification tag on a pushed change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Handshake acknowledgment sent once per connection; carries no change.
    Connected,
    Insert,
    Delete,
    Update,
    Replace,
    /// Any tag this client does not know. Such events are dropped.
    #[serde(other)]
    Other,
}

impl ChangeKind {
    /// True for events that add or remove catalog entries.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Insert | Self::Delete)
    }

    /// True for events that rewrite an existing version's backing data.
    pub fn is_content(self) -> bool {
        matches!(self, Self::Update | Self::Replace)
    }
}

/// One change event delivered over the push feed.
///
/// Fields beyond `type` and `version` are server detail and ignored here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChangeNotification {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub version: Option<String>,
}

/// Parses one payload from the push feed.
///
/// Malformed payloads are logged and dropped; they must never tear down
/// the subscription.
pub fn parse_notification(payload: &str) -> Option<ChangeNotification> {
    match serde_json::from_str(payload) {
        Ok(notification) => Some(notification),
        Err(e) => {
            warn!("Dropping malformed change notification ({}): {}", e, payload);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_notification_reads_type_and_version() {
        let notification =
            parse_notification(r#"{"type": "update", "version": "11.13.4"}"#).unwrap();

        assert_eq!(notification.kind, ChangeKind::Update);
        assert_eq!(notification.version.as_deref(), Some("11.13.4"));
    }

    #[test]
    fn parse_notification_ignores_extra_fields() {
        let notification = parse_notification(
            r#"{"type": "insert", "version": "12.0", "clusterTime": 17, "ns": {"coll": "tech_stack_data"}}"#,
        )
        .unwrap();

        assert_eq!(notification.kind, ChangeKind::Insert);
    }

    #[test]
    fn parse_notification_tolerates_missing_version() {
        let notification = parse_notification(r#"{"type": "connected"}"#).unwrap();

        assert_eq!(notification.kind, ChangeKind::Connected);
        assert_eq!(notification.version, None);
    }

    #[test]
    fn parse_notification_maps_unknown_type_to_other() {
        let notification = parse_notification(r#"{"type": "invalidate"}"#).unwrap();

        assert_eq!(notification.kind, ChangeKind::Other);
    }

    #[test]
    fn parse_notification_drops_malformed_payloads() {
        assert!(parse_notification("not json at all").is_none());
        assert!(parse_notification(r#"{"version": "1.0"}"#).is_none());
    }

    #[test]
    fn change_kind_classification() {
        assert!(ChangeKind::Insert.is_structural());
        assert!(ChangeKind::Delete.is_structural());
        assert!(ChangeKind::Update.is_content());
        assert!(ChangeKind::Replace.is_content());
        assert!(!ChangeKind::Connected.is_structural());
        assert!(!ChangeKind::Connected.is_content());
    }
}
