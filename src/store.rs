//! Durable feed storage.
//!
//! One JSON record per feed, replaced atomically on every update: new state
//! goes to a temporary file, is flushed, then renamed over the record.
//! Readers therefore always see a complete snapshot, and a crash mid-write
//! leaves the previous record intact. Appends to the same feed serialize on
//! a per-reference lock; appends to different feeds never contend.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tracing::debug;

use crate::error::Error;
use crate::feed::{Entry, Feed, NewEntry};
use crate::token;

pub struct FeedStore {
    dir: PathBuf,
    budget: usize,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FeedStore {
    /// Opens (and creates if needed) the store directory. `budget` bounds
    /// each feed's serialized entry collection in bytes.
    pub fn open(dir: impl Into<PathBuf>, budget: usize) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            budget,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Allocates a fresh reference and persists an empty feed.
    pub fn create(&self, title: &str) -> Result<Feed, Error> {
        let reference = loop {
            let candidate = token::generate();
            if !self.record_path(&candidate).exists() {
                break candidate;
            }
        };
        let now = Utc::now();
        let feed = Feed {
            reference,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
            entries: Vec::new(),
        };
        let lock = self.lock_for(&feed.reference);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        self.persist(&feed)?;
        debug!(reference = %feed.reference, "created feed");
        Ok(feed)
    }

    /// Appends one entry to the feed named by `reference`, assigning its
    /// identifier, enforcing the size budget, and advancing `updated_at`.
    /// The new state is durable before this returns.
    pub fn append(&self, reference: &str, entry: NewEntry) -> Result<(), Error> {
        let lock = self.lock_for(reference);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut feed = self.load(reference)?;

        let identifier = loop {
            let candidate = token::generate();
            if feed.entries.iter().all(|e| e.identifier != candidate) {
                break candidate;
            }
        };
        let entry = Entry {
            identifier,
            author: entry.author,
            title: entry.title,
            content_html: entry.content_html,
            received_at: entry.received_at,
        };

        // Newest first; an equal timestamp lands before earlier arrivals.
        let position = feed
            .entries
            .iter()
            .position(|existing| existing.received_at <= entry.received_at)
            .unwrap_or(feed.entries.len());
        feed.entries.insert(position, entry);

        enforce_budget(&mut feed.entries, self.budget);

        // updated_at must strictly increase per append even if the clock
        // has not moved past the previous value.
        let now = Utc::now();
        feed.updated_at = if now > feed.updated_at {
            now
        } else {
            feed.updated_at + Duration::milliseconds(1)
        };

        self.persist(&feed)?;
        debug!(reference = %feed.reference, entries = feed.entries.len(), "appended entry");
        Ok(())
    }

    /// Current persisted snapshot. Lock-free: rename-on-write guarantees
    /// the record read is complete.
    pub fn read(&self, reference: &str) -> Result<Feed, Error> {
        self.load(reference)
    }

    fn load(&self, reference: &str) -> Result<Feed, Error> {
        // Also keeps arbitrary strings out of the path.
        if !token::is_valid(reference) {
            return Err(Error::NotFound);
        }
        let raw = fs::read_to_string(self.record_path(reference))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self, feed: &Feed) -> Result<(), Error> {
        let path = self.record_path(&feed.reference);
        let tmp = path.with_extension("json.tmp");
        let serialized = serde_json::to_string(feed)?;
        let mut file = fs::File::create(&tmp)?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn record_path(&self, reference: &str) -> PathBuf {
        self.dir.join(format!("{reference}.json"))
    }

    fn lock_for(&self, reference: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(reference.to_string()).or_default().clone()
    }
}

/// Evicts oldest entries until the serialized collection fits `budget`.
/// When the sole surviving entry is still too large by itself, its content
/// is cut at a char boundary instead of dropping the entry, so the newest
/// entry is always present.
pub(crate) fn enforce_budget(entries: &mut Vec<Entry>, budget: usize) {
    fn size_of(entry: &Entry) -> usize {
        serde_json::to_string(entry).map(|s| s.len()).unwrap_or(0)
    }

    let mut total: usize = entries.iter().map(size_of).sum();
    while total > budget && entries.len() > 1 {
        if let Some(oldest) = entries.pop() {
            total -= size_of(&oldest);
            debug!(identifier = %oldest.identifier, "evicted entry over budget");
        }
    }

    if total > budget && let Some(entry) = entries.first_mut() {
        let original = entry.content_html.len();
        while size_of(entry) > budget && !entry.content_html.is_empty() {
            let excess = size_of(entry) - budget;
            let mut cut = entry.content_html.len().saturating_sub(excess.max(1));
            while cut > 0 && !entry.content_html.is_char_boundary(cut) {
                cut -= 1;
            }
            entry.content_html.truncate(cut);
        }
        if entry.content_html.len() < original {
            debug!(identifier = %entry.identifier, "truncated oversized entry content");
        }
    }
}
