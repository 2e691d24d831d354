use feedbox::Config;

pub(crate) fn cmd_create(config: &Config, title: &str) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let feed = store.create(title)?;
    println!("reference: {}", feed.reference);
    println!("address:   {}", config.address(&feed.reference));
    println!("feed url:  {}", config.feed_url(&feed.reference));
    Ok(())
}
