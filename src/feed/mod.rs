pub mod atom;
pub mod page;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mailbox and its accumulated entries, as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Unguessable token naming this feed, stable for its lifetime. Appears
    /// in the public feed URL and as the receiving address local part.
    pub reference: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Advanced on every successful append, never on read.
    pub updated_at: DateTime<Utc>,
    /// Newest first.
    pub entries: Vec<Entry>,
}

/// One delivered email, reduced to its renderable parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within the feed; forms the Atom `<id>` and the page URL.
    pub identifier: String,
    /// From header display text; empty when the header was absent.
    pub author: String,
    /// Subject; empty when absent.
    pub title: String,
    /// Sanitized HTML; may be empty.
    pub content_html: String,
    pub received_at: DateTime<Utc>,
}

/// An entry as produced by the normalizer, before the store assigns its
/// identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub author: String,
    pub title: String,
    pub content_html: String,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(day: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_feed_serde_roundtrip() {
        let feed = Feed {
            reference: "abcdefgh12345678".to_string(),
            title: "A newsletter".to_string(),
            created_at: timestamp(1),
            updated_at: timestamp(2),
            entries: vec![Entry {
                identifier: "0123456789abcdef".to_string(),
                author: "p@example.com".to_string(),
                title: "Hi".to_string(),
                content_html: "<p>Some HTML</p>".to_string(),
                received_at: timestamp(2),
            }],
        };

        let json = serde_json::to_string(&feed).unwrap();
        let deserialized: Feed = serde_json::from_str(&json).unwrap();
        assert_eq!(feed, deserialized);
    }

    #[test]
    fn test_entry_serde_roundtrip_with_empty_fields() {
        let entry = Entry {
            identifier: "0123456789abcdef".to_string(),
            author: String::new(),
            title: String::new(),
            content_html: String::new(),
            received_at: timestamp(1),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
