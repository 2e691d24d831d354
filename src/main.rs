mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use feedbox::Config;

/// Read email newsletters through Atom feeds
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a mailbox and print its receiving address and feed URL
    Create {
        /// Display title of the new feed
        title: String,
    },
    /// Deliver a raw message read from a file, or stdin when omitted
    Deliver {
        /// File containing the message (headers, blank line, body)
        file: Option<PathBuf>,
    },
    /// Print a feed's Atom document
    Show {
        /// The feed's reference
        reference: String,
    },
    /// Print the standalone page for one entry
    Page {
        /// The feed's reference
        reference: String,
        /// The entry's identifier
        entry: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    match args.command {
        Command::Create { ref title } => commands::create::cmd_create(&config, title),
        Command::Deliver { ref file } => commands::deliver::cmd_deliver(&config, file.as_deref()),
        Command::Show { ref reference } => commands::show::cmd_show(&config, reference),
        Command::Page {
            ref reference,
            ref entry,
        } => commands::page::cmd_page(&config, reference, entry),
    }
}
