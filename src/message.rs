//! The decoded inbound message and its reduction to a feed entry.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::feed::NewEntry;
use crate::sanitize::{self, BodyKind};
use crate::token;

/// A fully reconstructed email as handed over by the receiving layer:
/// headers decoded, body parts separated. The engine never sees wire-level
/// SMTP or MIME framing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    /// From header display text.
    pub from: Option<String>,
    /// Envelope/header recipients.
    pub to: Vec<String>,
    pub subject: Option<String>,
    /// Raw Date header value, parsed leniently during normalization.
    pub date: Option<String>,
    /// Plain text body part.
    pub text: Option<String>,
    /// HTML body part; takes precedence over `text` when both exist.
    pub html: Option<String>,
}

impl InboundMessage {
    /// Builds a message from simple RFC 822-style text: header lines, a
    /// blank line, then the body. A `Content-Type: text/html` header marks
    /// the body as HTML. This is the stand-in for a real receiving layer,
    /// used by the CLI and tests.
    pub fn parse(raw: &str) -> Self {
        let mut message = Self::default();
        let mut html_body = false;
        let mut lines = raw.lines();
        for line in lines.by_ref() {
            if line.trim().is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "from" => message.from = Some(value.to_string()),
                "to" => message.to.extend(
                    value
                        .split(',')
                        .map(|addr| addr.trim().to_string())
                        .filter(|addr| !addr.is_empty()),
                ),
                "subject" => message.subject = Some(value.to_string()),
                "date" => message.date = Some(value.to_string()),
                "content-type" => {
                    html_body = value.to_ascii_lowercase().starts_with("text/html");
                }
                _ => {}
            }
        }
        let body = lines.collect::<Vec<_>>().join("\n");
        if !body.trim().is_empty() {
            if html_body {
                message.html = Some(body);
            } else {
                message.text = Some(body);
            }
        }
        message
    }
}

/// A message resolved to its target feed, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    pub reference: String,
    pub entry: NewEntry,
}

/// Extracts the target reference and renderable fields from a message.
///
/// Returns `None` when no recipient is shaped like a mailbox address; that
/// is "no target", not an error. Absent headers degrade to empty strings,
/// an unparseable date degrades to the acceptance time.
pub fn normalize(message: &InboundMessage, config: &Config) -> Option<NormalizedMessage> {
    let reference = target_reference(&message.to, &config.host)?;

    let content_html = if let Some(html) = &message.html {
        sanitize::render(html, BodyKind::Html, &config.base_url)
    } else if let Some(text) = &message.text {
        sanitize::render(text, BodyKind::Plain, &config.base_url)
    } else {
        String::new()
    };

    let received_at = message
        .date
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(Utc::now);

    Some(NormalizedMessage {
        reference,
        entry: NewEntry {
            author: message.from.clone().unwrap_or_default(),
            title: message.subject.clone().unwrap_or_default(),
            content_html,
            received_at,
        },
    })
}

/// First recipient shaped `<token>@<host>`, host compared case-insensitively.
fn target_reference(recipients: &[String], host: &str) -> Option<String> {
    recipients.iter().find_map(|addr| {
        let (local, domain) = addr.trim().rsplit_once('@')?;
        (domain.eq_ignore_ascii_case(host) && token::is_valid(local))
            .then(|| local.to_string())
    })
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}
