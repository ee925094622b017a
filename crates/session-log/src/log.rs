//! History log implementation

use crate::LogError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Default log capacity (one entry per second, one hour)
pub const DEFAULT_CAPACITY: usize = 3600;

/// Round to two decimals, the precision recorded in history and summaries
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Per-entry classification of the sampled snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Safe,
    Danger,
}

/// One per-second sample of the live snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: String,
    pub status: EntryStatus,
    pub score: u32,
    pub ear: f32,
    pub mar: f32,
    pub is_drowsy: bool,
}

impl HistoryEntry {
    /// Build an entry from live values; the log assigns the id on append.
    pub fn sample(score: u32, ear: f32, mar: f32, is_drowsy: bool) -> Self {
        Self {
            id: 0,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            status: if is_drowsy {
                EntryStatus::Danger
            } else {
                EntryStatus::Safe
            },
            score,
            ear: round2(ear),
            mar: round2(mar),
            is_drowsy,
        }
    }
}

/// End-of-session statistics folded over the log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub duration: u64,
    pub avg_ear: f32,
    pub avg_mar: f32,
    pub drowsy_count: usize,
    pub max_score: u32,
    pub timestamp: String,
}

struct Inner {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
}

/// Bounded FIFO of history entries.
///
/// Mutation and enumeration serialize on one lock; enumeration copies the
/// contents out so readers never hold the lock across iteration. Ids come
/// from a monotonic counter so eviction never produces a duplicate; `clear`
/// restarts them at 1.
pub struct HistoryLog {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: VecDeque::with_capacity(capacity),
                next_id: 1,
            }),
            capacity,
        }
    }

    /// Create a log with the default capacity (3600 entries)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Append an entry, evicting the oldest one at capacity. Returns the
    /// assigned id.
    pub fn append(&self, mut entry: HistoryEntry) -> Result<u64, LogError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| LogError::Lock(e.to_string()))?;

        if inner.entries.len() == self.capacity {
            inner.entries.pop_front();
        }

        entry.id = inner.next_id;
        inner.next_id += 1;

        let id = entry.id;
        inner.entries.push_back(entry);
        Ok(id)
    }

    /// Empty the log and restart ids at 1
    pub fn clear(&self) -> Result<(), LogError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| LogError::Lock(e.to_string()))?;
        inner.entries.clear();
        inner.next_id = 1;
        debug!("history log cleared");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy of the current contents, oldest first
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, LogError> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| LogError::Lock(e.to_string()))?;
        Ok(inner.entries.iter().cloned().collect())
    }

    /// Fold the log into a summary. `None` when the log is empty.
    pub fn summary(&self, duration_secs: u64) -> Result<Option<SessionSummary>, LogError> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| LogError::Lock(e.to_string()))?;

        if inner.entries.is_empty() {
            return Ok(None);
        }

        let n = inner.entries.len() as f32;
        let avg_ear = inner.entries.iter().map(|e| e.ear).sum::<f32>() / n;
        let avg_mar = inner.entries.iter().map(|e| e.mar).sum::<f32>() / n;
        let drowsy_count = inner.entries.iter().filter(|e| e.is_drowsy).count();
        let max_score = inner.entries.iter().map(|e| e.score).max().unwrap_or(0);

        Ok(Some(SessionSummary {
            duration: duration_secs,
            avg_ear: round2(avg_ear),
            avg_mar: round2(avg_mar),
            drowsy_count,
            max_score,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }))
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
