//! Renders the standalone HTML page for a single entry.

use crate::feed::{Entry, Feed};
use crate::sanitize::escape;

/// Minimal page: escaped title and author, the already-sanitized content
/// embedded as-is, and a noindex hint mirroring the serving layer's
/// `X-Robots-Tag` header.
pub fn render(feed: &Feed, entry: &Entry) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"robots\" content=\"noindex\">\n");
    out.push_str(&format!(
        "<title>{} - {}</title>\n</head>\n<body>\n<article>\n",
        escape(&entry.title),
        escape(&feed.title)
    ));
    out.push_str(&format!("<h1>{}</h1>\n", escape(&entry.title)));
    out.push_str(&format!(
        "<p><span>{}</span> <time datetime=\"{}\">{}</time></p>\n",
        escape(&entry.author),
        entry.received_at.to_rfc3339(),
        entry.received_at.format("%Y-%m-%d")
    ));
    out.push_str(&entry.content_html);
    out.push_str("\n</article>\n</body>\n</html>\n");
    out
}
