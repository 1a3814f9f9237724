//! Periodic sync with the remote quote endpoint.

mod client;
mod scheduler;

pub use client::RemoteSyncClient;
pub use scheduler::{SyncOutcome, SyncScheduler};
