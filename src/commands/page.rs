use anyhow::anyhow;

use feedbox::Config;
use feedbox::feed::page;

pub(crate) fn cmd_page(config: &Config, reference: &str, identifier: &str) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let feed = store.read(reference)?;
    let entry = feed
        .entries
        .iter()
        .find(|e| e.identifier == identifier)
        .ok_or_else(|| anyhow!("no entry {identifier} in feed {reference}"))?;
    print!("{}", page::render(&feed, entry));
    Ok(())
}
