use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Remembers recently published `emitted_at_ms` markers for a fixed window
///
/// Entries are pruned lazily on every access instead of by per-entry timers,
/// so behaviour depends only on the instants passed in.
#[derive(Debug)]
pub struct EchoCache {
    window: Duration,
    entries: BTreeMap<i64, Instant>,
}

impl EchoCache {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, emitted_at_ms: i64, now: Instant) {
        self.prune(now);
        self.entries.insert(emitted_at_ms, now);
    }

    pub fn contains(&mut self, emitted_at_ms: i64, now: Instant) -> bool {
        self.prune(now);
        self.entries.contains_key(&emitted_at_ms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.entries
            .retain(|_, inserted_at| now.saturating_duration_since(*inserted_at) < window);
    }
}
