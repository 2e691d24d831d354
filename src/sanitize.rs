//! Turns message bodies into display-ready HTML.
//!
//! Plain text is escaped, split into paragraphs, and auto-linked. Declared
//! HTML is parsed with html5ever (browser-grade recovery, never fails) and
//! rebuilt from an element/attribute allow-list: unknown elements are
//! unwrapped so their text survives, dangerous ones are dropped outright,
//! and every URL is resolved against the configured base with unsafe
//! schemes rejected.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

/// Declared kind of a message body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

/// Elements kept as-is: text formatting, links, images, lists, tables,
/// block structure.
const ALLOWED_ELEMENTS: &[&str] = &[
    "a",
    "abbr",
    "b",
    "blockquote",
    "br",
    "caption",
    "code",
    "dd",
    "del",
    "div",
    "dl",
    "dt",
    "em",
    "figcaption",
    "figure",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "i",
    "img",
    "ins",
    "li",
    "ol",
    "p",
    "pre",
    "q",
    "s",
    "small",
    "span",
    "strong",
    "sub",
    "sup",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "u",
    "ul",
];

/// Elements whose content is code or foreign markup rather than prose;
/// these are removed together with everything inside them.
const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "template", "iframe", "object", "embed", "applet", "noscript",
];

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// URL schemes that must never reach a feed reader.
const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "vbscript", "file", "about"];

/// Renders a message body as safe HTML. Absent or blank bodies render as
/// the empty string.
pub fn render(body: &str, kind: BodyKind, base: &Url) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    match kind {
        BodyKind::Plain => render_plain(body),
        BodyKind::Html => render_html(body, base),
    }
}

fn render_plain(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut out = String::new();
    for paragraph in normalized.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        out.push_str("<p>");
        for (i, line) in paragraph.lines().enumerate() {
            if i > 0 {
                out.push_str("<br>");
            }
            push_autolinked(&mut out, line);
        }
        out.push_str("</p>");
    }
    out
}

fn push_autolinked(out: &mut String, line: &str) {
    let mut rest = line;
    while let Some(start) = find_url_start(rest) {
        push_escaped(out, &rest[..start]);
        let tail = &rest[start..];
        let end = tail
            .find(|c: char| c.is_whitespace())
            .unwrap_or(tail.len());
        let (href, trailing) = split_trailing_punctuation(&tail[..end]);
        out.push_str("<a href=\"");
        push_escaped(out, href);
        out.push_str("\">");
        push_escaped(out, href);
        out.push_str("</a>");
        push_escaped(out, trailing);
        rest = &tail[end..];
    }
    push_escaped(out, rest);
}

fn find_url_start(s: &str) -> Option<usize> {
    match (s.find("http://"), s.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Sentence punctuation directly after a URL belongs to the sentence.
fn split_trailing_punctuation(url: &str) -> (&str, &str) {
    let kept = url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '\'', '"']);
    url.split_at(kept.len())
}

fn render_html(html: &str, base: &Url) -> String {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut out = String::new();
    if let Some(body) = find_element(&dom.document, "body") {
        for child in body.children.borrow().iter() {
            write_node(child, base, &mut out);
        }
    }
    out
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = node.data
        && name.local.as_ref() == tag
    {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn write_node(node: &Handle, base: &Url, out: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => push_escaped(out, &contents.borrow()),
        NodeData::Element { ref name, ref attrs, .. } => {
            let tag = name.local.as_ref();
            if DROPPED_ELEMENTS.contains(&tag) {
                return;
            }
            if !ALLOWED_ELEMENTS.contains(&tag) {
                // Unwrap: the element disappears, its content survives.
                for child in node.children.borrow().iter() {
                    write_node(child, base, out);
                }
                return;
            }
            out.push('<');
            out.push_str(tag);
            for attr in attrs.borrow().iter() {
                let key = attr.name.local.as_ref();
                if !allowed_attribute(tag, key) {
                    continue;
                }
                let value = if is_url_attribute(key) {
                    match resolve_url(&attr.value, base) {
                        Some(resolved) => resolved,
                        None => continue,
                    }
                } else {
                    attr.value.to_string()
                };
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                push_escaped(out, &value);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            for child in node.children.borrow().iter() {
                write_node(child, base, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        // Comments, doctypes, and processing instructions carry no content.
        _ => {}
    }
}

fn allowed_attribute(element: &str, attribute: &str) -> bool {
    matches!(
        (element, attribute),
        ("a", "href" | "title")
            | ("img", "src" | "alt" | "title" | "width" | "height")
            | ("td" | "th", "colspan" | "rowspan")
            | ("blockquote" | "q" | "del" | "ins", "cite")
            | ("ol", "start")
    )
}

fn is_url_attribute(attribute: &str) -> bool {
    matches!(attribute, "href" | "src" | "cite")
}

fn resolve_url(raw: &str, base: &Url) -> Option<String> {
    let resolved = base.join(raw.trim()).ok()?;
    if BLOCKED_SCHEMES.contains(&resolved.scheme()) {
        return None;
    }
    Some(resolved.to_string())
}

pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}
