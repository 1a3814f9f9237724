//! WebSocket message protocol definitions.
//!
//! All messages are JSON-encoded and use snake_case for field names.

use quotebook_engine::{CategoryOptions, MergeReport, Quote, View};
use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current selector and view.
    State,

    /// Keep-alive ping.
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A sync cycle changed the collection.
    SyncApplied {
        /// Local categories overwritten by the remote side
        conflicts: usize,
        /// Remote quotes appended
        added: usize,
        /// Human readable summary for the notification
        summary: String,
        /// Rebuilt category selector
        categories: CategoryOptions,
        /// Re-rendered view for the active filter
        view: View,
        /// Rendered view
        html: String,
        /// When the sync finished (RFC 3339)
        synced_at: String,
    },

    /// A quote was added.
    QuoteAdded {
        quote: Quote,
        /// Category selector including the new quote's category
        categories: CategoryOptions,
    },

    /// Response to a state request.
    State {
        categories: CategoryOptions,
        view: View,
        html: String,
    },

    /// Response to ping.
    Pong,

    /// Error message.
    Error {
        /// Error description
        message: String,
    },
}

impl ServerMessage {
    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Create a sync_applied notification.
    pub fn sync_applied(
        report: &MergeReport,
        categories: CategoryOptions,
        view: View,
        synced_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        ServerMessage::SyncApplied {
            conflicts: report.conflict_count(),
            added: report.added_count(),
            summary: report.summary(),
            categories,
            html: view.render_html(),
            view,
            synced_at: synced_at.to_rfc3339(),
        }
    }

    /// Create a state message.
    pub fn state(categories: CategoryOptions, view: View) -> Self {
        ServerMessage::State {
            categories,
            html: view.render_html(),
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_engine::CategoryFilter;

    fn options() -> CategoryOptions {
        CategoryOptions {
            options: vec!["all".into(), "Life".into()],
            selected: CategoryFilter::All,
        }
    }

    #[test]
    fn test_client_message_deserialization() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "state"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::State));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "push"}"#).is_err());
    }

    #[test]
    fn test_server_message_serialization() {
        let msg = ServerMessage::Pong;
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"pong"}"#);

        let msg = ServerMessage::error("test error");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains(r#""message":"test error""#));
    }

    #[test]
    fn test_sync_applied_serialization() {
        let report = MergeReport {
            conflicts: Vec::new(),
            added: vec![Quote::new("A", "Life")],
        };
        let view = View::List {
            quotes: vec![Quote::new("A", "Life")],
        };
        let synced_at = chrono::DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);

        let msg = ServerMessage::sync_applied(&report, options(), view, synced_at);
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "sync_applied");
        assert_eq!(json["conflicts"], 0);
        assert_eq!(json["added"], 1);
        assert_eq!(json["categories"]["options"][1], "Life");
        assert_eq!(json["view"]["kind"], "list");
        assert_eq!(json["synced_at"], "2024-02-01T00:00:00+00:00");
    }
}
