use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

use feedbox::{Config, Delivery, InboundMessage, deliver};

pub(crate) fn cmd_deliver(config: &Config, file: Option<&Path>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let message = InboundMessage::parse(&raw);
    let store = super::open_store(config)?;
    match deliver(&store, config, &message)? {
        Delivery::Appended { reference } => println!("delivered to {reference}"),
        Delivery::NoTarget | Delivery::UnknownReference => println!("no matching mailbox, dropped"),
    }
    Ok(())
}
