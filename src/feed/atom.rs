//! Renders a stored feed as an Atom document.

use atom_syndication::{Content, Entry as AtomEntry, Feed as AtomFeed, Link, Person, Text};

use crate::config::Config;
use crate::feed::Feed;

/// Content type the document must be served with.
pub const CONTENT_TYPE: &str = "application/atom+xml";

/// Header the serving layer attaches to feed and entry-page responses;
/// feeds are not meant to be search-indexed.
pub const ROBOTS_HEADER: (&str, &str) = ("X-Robots-Tag", "noindex");

/// Pure and deterministic: the same snapshot always renders to the same
/// bytes. Titles, authors, and HTML content are escaped by the Atom writer.
pub fn render(feed: &Feed, config: &Config) -> String {
    let mut document = AtomFeed::default();
    document.set_title(Text::plain(feed.title.clone()));
    document.set_id(config.feed_url(&feed.reference));
    document.set_updated(feed.updated_at.fixed_offset());

    let mut self_link = Link::default();
    self_link.set_href(config.feed_url(&feed.reference));
    self_link.set_rel("self");
    self_link.set_mime_type(Some(CONTENT_TYPE.to_string()));
    document.set_links(vec![self_link]);

    let entries: Vec<AtomEntry> = feed
        .entries
        .iter()
        .map(|entry| {
            let mut out = AtomEntry::default();
            out.set_title(Text::plain(entry.title.clone()));
            out.set_id(format!(
                "urn:feedbox:{}:{}",
                feed.reference, entry.identifier
            ));
            out.set_updated(entry.received_at.fixed_offset());

            let mut author = Person::default();
            author.set_name(entry.author.clone());
            out.set_authors(vec![author]);

            let mut link = Link::default();
            link.set_href(config.entry_url(&feed.reference, &entry.identifier));
            link.set_rel("alternate");
            link.set_mime_type(Some("text/html".to_string()));
            out.set_links(vec![link]);

            let mut content = Content::default();
            content.set_content_type(Some("html".to_string()));
            content.set_value(Some(entry.content_html.clone()));
            out.set_content(Some(content));

            out
        })
        .collect();
    document.set_entries(entries);

    document.to_string()
}
