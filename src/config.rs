use std::path::PathBuf;

use url::Url;

/// Default per-feed size budget in bytes. Large enough for dozens of typical
/// newsletter issues; override with `FEEDBOX_BUDGET`.
pub const DEFAULT_BUDGET: usize = 512 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Host suffix recognized in recipient addresses (`<reference>@<host>`).
    pub host: String,
    /// Public base for feed and entry-page URLs; also the base relative
    /// links in sanitized HTML are resolved against.
    pub base_url: Url,
    /// Per-feed serialized size budget in bytes.
    pub budget: usize,
    /// Directory holding one record per feed.
    pub store_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            base_url: Url::parse("http://localhost/").expect("literal URL parses"),
            budget: DEFAULT_BUDGET,
            store_dir: PathBuf::from("feeds"),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("FEEDBOX_HOST") {
            config.host = host;
        }
        if let Ok(base) = std::env::var("FEEDBOX_BASE_URL") {
            config.base_url = Url::parse(&base)?;
        }
        if let Ok(budget) = std::env::var("FEEDBOX_BUDGET") {
            config.budget = budget.parse()?;
        }
        if let Ok(dir) = std::env::var("FEEDBOX_STORE") {
            config.store_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Public URL of a feed's Atom document.
    pub fn feed_url(&self, reference: &str) -> String {
        format!("{}feeds/{reference}.xml", self.base())
    }

    /// Public URL of an entry's standalone page.
    pub fn entry_url(&self, reference: &str, identifier: &str) -> String {
        format!("{}feeds/{reference}/{identifier}.html", self.base())
    }

    /// Receiving email address of a feed.
    pub fn address(&self, reference: &str) -> String {
        format!("{reference}@{}", self.host)
    }

    fn base(&self) -> String {
        let base = self.base_url.as_str();
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        }
    }
}
