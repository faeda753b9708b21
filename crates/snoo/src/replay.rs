//! Feed recordings and replay setup.
//!
//! A recording is a JSON-lines file of feed messages. Replaying it pushes
//! each message through a `MemoryFeed` into a `DeviceHub`, exactly as a
//! live transport adapter would.

use std::path::Path;
use std::sync::Arc;

use snoo_api::{FeedMessage, MemoryFeed, parse_record};
use snoo_config::RuntimeDevice;
use snoo_core::{DeviceHub, SynchronizerSnapshot};
use tracing::debug;

use crate::error::CliError;

/// Parse every record in `path`. Blank lines and `#` comments are skipped.
pub fn load_recording(path: &Path) -> Result<Vec<FeedMessage>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::RecordingUnreadable {
        path: path.display().to_string(),
        source,
    })?;

    let mut messages = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let message = parse_record(line).map_err(|e| CliError::InvalidRecord {
            path: path.display().to_string(),
            line: index + 1,
            message: e.to_string(),
        })?;
        messages.push(message);
    }
    debug!(records = messages.len(), path = %path.display(), "loaded recording");
    Ok(messages)
}

/// A hub wired to an in-memory feed, plus the messages still to deliver.
pub struct Replay {
    pub feed: MemoryFeed,
    pub hub: DeviceHub,
    pub live: Vec<FeedMessage>,
}

impl Replay {
    /// Build the feed and hub. The first `preload` activity records (and
    /// any connectivity markers before them) are published before attach,
    /// so they land in feed history instead of reaching the synchronizer.
    pub fn new(
        messages: Vec<FeedMessage>,
        preload: usize,
        connected: bool,
        runtime: RuntimeDevice,
    ) -> Self {
        let feed = MemoryFeed::new(connected);

        let mut live = messages.into_iter();
        let mut preloaded = 0;
        while preloaded < preload {
            let Some(message) = live.next() else { break };
            if matches!(message, FeedMessage::Activity(_)) {
                preloaded += 1;
            }
            feed.publish(message);
        }
        debug!(preloaded, history = feed.history_len(), "feed history prepared");

        let hub = DeviceHub::new(runtime.device, Arc::new(feed.clone()), runtime.sync);
        Self {
            feed,
            hub,
            live: live.collect(),
        }
    }

    /// Attach the hub's synchronizer to the feed.
    pub async fn start(&self) -> Result<SynchronizerSnapshot, CliError> {
        Ok(self.hub.start().await?)
    }

    /// Deliver one live message through the feed.
    pub fn deliver(&self, message: FeedMessage) {
        self.feed.publish(message);
    }
}
