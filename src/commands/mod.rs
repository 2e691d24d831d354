pub mod create;
pub mod deliver;
pub mod page;
pub mod show;

use anyhow::Context;

use feedbox::{Config, FeedStore};

pub(crate) fn open_store(config: &Config) -> anyhow::Result<FeedStore> {
    FeedStore::open(&config.store_dir, config.budget)
        .with_context(|| format!("failed to open store at {}", config.store_dir.display()))
}
