//! WebSocket notifications.
//!
//! Pages connect via WebSocket and are told when the quote collection changes
//! underneath them: after a sync merged remote quotes, or when a quote was
//! added through another page.

mod manager;
mod protocol;

pub use manager::ConnectionManager;
pub use protocol::*;
