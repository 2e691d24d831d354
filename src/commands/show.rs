use feedbox::Config;
use feedbox::feed::atom;

pub(crate) fn cmd_show(config: &Config, reference: &str) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let feed = store.read(reference)?;
    print!("{}", atom::render(&feed, config));
    Ok(())
}
