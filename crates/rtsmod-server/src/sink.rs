//! Sync sink for a standalone server: snapshots go to the log as JSON.

use rtsmod_core::sync::{CitySnapshot, SyncSink};
use tracing::{info, warn};

/// Writes each snapshot as one structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SyncSink for LogSink {
    fn push(&self, snapshot: &CitySnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => info!(owner = %snapshot.owner, snapshot = %json, "city sync"),
            Err(e) => warn!(owner = %snapshot.owner, error = %e, "failed to encode city snapshot"),
        }
    }
}
