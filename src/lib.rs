//! # feedbox
//!
//! feedbox turns email newsletters into Atom feeds. Creating a mailbox
//! allocates an unguessable reference that doubles as the local part of the
//! mailbox's receiving address and as the path of its public feed URL. Every
//! message delivered to that address becomes one dated feed entry: the body
//! is sanitized (or converted from plain text), the entry list is kept under
//! a fixed size budget by evicting oldest entries, and each update is
//! persisted atomically so readers never see a torn feed.
//!
//! The crate is the engine only. SMTP and HTTP front ends hand in decoded
//! [`InboundMessage`]s and serve the rendered documents; see
//! [`feed::atom::render`] and [`feed::page::render`].
//!
//! ```no_run
//! use feedbox::{deliver, Config, FeedStore, InboundMessage};
//!
//! # fn main() -> Result<(), feedbox::Error> {
//! let config = Config::default();
//! let store = FeedStore::open(&config.store_dir, config.budget)?;
//!
//! let feed = store.create("A newsletter")?;
//! println!("send mail to {}", config.address(&feed.reference));
//!
//! let message = InboundMessage::parse("From: p@example.com\n\nhello");
//! deliver(&store, &config, &message)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod deliver;
pub mod error;
pub mod feed;
pub mod message;
pub mod sanitize;
pub mod store;
pub mod token;

pub use config::Config;
pub use deliver::{Delivery, deliver};
pub use error::Error;
pub use feed::{Entry, Feed, NewEntry};
pub use message::InboundMessage;
pub use store::FeedStore;
