use std::fs;
use std::io::BufReader;

use atom_syndication::Feed as AtomFeed;
use tempfile::TempDir;

use feedbox::feed::atom;
use feedbox::{Config, Delivery, FeedStore, InboundMessage, deliver};

struct TestContext {
    dir: TempDir,
    config: Config,
}

impl TestContext {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            host: "feeds.example.com".to_string(),
            store_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        Self { dir, config }
    }

    fn with_budget(budget: usize) -> Self {
        let mut context = Self::new();
        context.config.budget = budget;
        context
    }

    fn store(&self) -> FeedStore {
        FeedStore::open(&self.config.store_dir, self.config.budget).unwrap()
    }

    fn records(&self) -> Vec<(String, String)> {
        let mut records: Vec<(String, String)> = fs::read_dir(self.dir.path())
            .unwrap()
            .flatten()
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let contents = fs::read_to_string(entry.path()).unwrap();
                (name, contents)
            })
            .collect();
        records.sort();
        records
    }
}

fn parse_feed(xml: &str) -> AtomFeed {
    AtomFeed::read_from(BufReader::new(xml.as_bytes())).expect("rendered feed parses")
}

fn message(to: &str, raw_body: &str) -> InboundMessage {
    InboundMessage::parse(&format!("To: {to}\n\n{raw_body}"))
}

#[test]
fn test_html_delivery_end_to_end() {
    let context = TestContext::new();
    let store = context.store();
    let feed = store.create("A newsletter").unwrap();
    let address = context.config.address(&feed.reference);

    let raw = format!(
        "From: p@example.com\nTo: {address}\nSubject: Hi\nContent-Type: text/html\n\n<p>Some HTML</p>"
    );
    let outcome = deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();
    assert!(matches!(outcome, Delivery::Appended { .. }));

    let xml = atom::render(&store.read(&feed.reference).unwrap(), &context.config);
    let parsed = parse_feed(&xml);

    assert_eq!(parsed.title().as_str(), "A newsletter");
    assert!(parsed.updated().to_utc() > feed.created_at);
    let entry = &parsed.entries()[0];
    assert_eq!(entry.title().as_str(), "Hi");
    assert_eq!(entry.authors()[0].name(), "p@example.com");
    assert_eq!(
        entry.content().unwrap().value(),
        Some("<p>Some HTML</p>")
    );
}

#[test]
fn test_plain_text_link_becomes_anchor() {
    let context = TestContext::new();
    let store = context.store();
    let feed = store.create("links").unwrap();

    let raw = format!(
        "To: {}\nSubject: link\n\nA link: https://example.com",
        context.config.address(&feed.reference)
    );
    deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();

    let read = store.read(&feed.reference).unwrap();
    assert_eq!(
        read.entries[0].content_html,
        "<p>A link: <a href=\"https://example.com\">https://example.com</a></p>"
    );
}

#[test]
fn test_missing_from_renders_empty_author() {
    let context = TestContext::new();
    let store = context.store();
    let feed = store.create("anonymous").unwrap();

    let raw = format!(
        "To: {}\nSubject: no sender\n\nbody",
        context.config.address(&feed.reference)
    );
    deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();

    let xml = atom::render(&store.read(&feed.reference).unwrap(), &context.config);
    let parsed = parse_feed(&xml);
    let authors = parsed.entries()[0].authors();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name(), "");
}

#[test]
fn test_unknown_reference_changes_no_existing_feed() {
    let context = TestContext::new();
    let store = context.store();
    store.create("one").unwrap();
    store.create("two").unwrap();
    let before = context.records();

    let outcome = deliver(
        &store,
        &context.config,
        &message("abcdefgh12345678@feeds.example.com", "probe"),
    )
    .unwrap();
    assert_eq!(outcome, Delivery::UnknownReference);
    assert_eq!(context.records(), before);

    let outcome = deliver(
        &store,
        &context.config,
        &message("not-a-mailbox@feeds.example.com", "probe"),
    )
    .unwrap();
    assert_eq!(outcome, Delivery::NoTarget);
    assert_eq!(context.records(), before);
}

#[test]
fn test_rendering_persisted_state_is_idempotent() {
    let context = TestContext::new();
    let store = context.store();
    let feed = store.create("stable").unwrap();
    let raw = format!(
        "From: a@example.com\nTo: {}\nSubject: once\n\nbody",
        context.config.address(&feed.reference)
    );
    deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();

    let first = atom::render(&store.read(&feed.reference).unwrap(), &context.config);
    let second = atom::render(&store.read(&feed.reference).unwrap(), &context.config);
    assert_eq!(first, second);
}

#[test]
fn test_budget_keeps_newest_entry_and_evicts_oldest() {
    let context = TestContext::with_budget(4096);
    let store = context.store();
    let feed = store.create("flooded").unwrap();
    let address = context.config.address(&feed.reference);

    for i in 0..30 {
        let raw = format!(
            "From: a@example.com\nTo: {address}\nSubject: issue {i}\n\n{}",
            "filler ".repeat(60)
        );
        deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();
    }

    let read = store.read(&feed.reference).unwrap();
    assert!(read.entries.len() < 30);
    let titles: Vec<&str> = read.entries.iter().map(|e| e.title.as_str()).collect();
    assert!(titles.contains(&"issue 29"));
    assert!(!titles.contains(&"issue 0"));
    let total: usize = read
        .entries
        .iter()
        .map(|e| serde_json::to_string(e).unwrap().len())
        .sum();
    assert!(total <= 4096);
}

#[test]
fn test_reopened_store_serves_previous_state() {
    let context = TestContext::new();
    let reference = {
        let store = context.store();
        let feed = store.create("durable").unwrap();
        let raw = format!(
            "To: {}\nSubject: persisted\n\nstill here",
            context.config.address(&feed.reference)
        );
        deliver(&store, &context.config, &InboundMessage::parse(&raw)).unwrap();
        feed.reference
    };

    let reopened = context.store();
    let read = reopened.read(&reference).unwrap();
    assert_eq!(read.title, "durable");
    assert_eq!(read.entries.len(), 1);
    assert_eq!(read.entries[0].title, "persisted");
}

mod cli {
    use assert_cmd::Command;
    use tempfile::TempDir;

    fn run(dir: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
        #[allow(deprecated)]
        Command::cargo_bin("feedbox")
            .unwrap()
            .args(args)
            .env("FEEDBOX_STORE", dir.path())
            .env("FEEDBOX_HOST", "feeds.example.com")
            .assert()
    }

    fn created_reference(stdout: &[u8]) -> String {
        String::from_utf8_lossy(stdout)
            .lines()
            .find_map(|line| line.strip_prefix("reference: ").map(str::to_string))
            .expect("create prints the reference")
    }

    #[test]
    fn test_create_deliver_show_round_trip() {
        let dir = TempDir::new().unwrap();

        let created = run(&dir, &["create", "A newsletter"]).success();
        let reference = created_reference(&created.get_output().stdout);

        #[allow(deprecated)]
        let delivered = Command::cargo_bin("feedbox")
            .unwrap()
            .arg("deliver")
            .env("FEEDBOX_STORE", dir.path())
            .env("FEEDBOX_HOST", "feeds.example.com")
            .write_stdin(format!(
                "From: p@example.com\nTo: {reference}@feeds.example.com\nSubject: Hi\n\nhello feed"
            ))
            .assert()
            .success();
        let stdout = String::from_utf8_lossy(&delivered.get_output().stdout).to_string();
        assert!(stdout.contains("delivered"));

        let shown = run(&dir, &["show", &reference]).success();
        let xml = String::from_utf8_lossy(&shown.get_output().stdout).to_string();
        assert!(xml.contains("A newsletter"));
        assert!(xml.contains("hello feed"));
    }

    #[test]
    fn test_show_unknown_reference_fails() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["show", "abcdefgh12345678"]).failure();
    }
}
