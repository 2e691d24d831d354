//! One accepted message in, zero or one appended entry out.

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::message::{self, InboundMessage};
use crate::store::FeedStore;

/// What became of a delivered message. Recipients that resolve to nothing
/// are dropped without error: the sender must not be able to probe which
/// references exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Appended { reference: String },
    /// No recipient was shaped like a mailbox address.
    NoTarget,
    /// A recipient was well-formed but names no known feed.
    UnknownReference,
}

/// Normalizes the message, resolves its target feed, and appends exactly
/// one entry. Only storage failures are errors; unresolvable recipients
/// complete as silent no-ops.
pub fn deliver(
    store: &FeedStore,
    config: &Config,
    message: &InboundMessage,
) -> Result<Delivery, Error> {
    let Some(normalized) = message::normalize(message, config) else {
        debug!("no recipient names a mailbox, dropping message");
        return Ok(Delivery::NoTarget);
    };

    match store.append(&normalized.reference, normalized.entry) {
        Ok(()) => Ok(Delivery::Appended {
            reference: normalized.reference,
        }),
        Err(Error::NotFound) => {
            debug!(reference = %normalized.reference, "recipient names no known feed, dropping message");
            Ok(Delivery::UnknownReference)
        }
        Err(e) => Err(e),
    }
}
