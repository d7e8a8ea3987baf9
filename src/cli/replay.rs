//! Replay command implementation.
//!
//! Parses a captured `text/event-stream` body and hands each message to an
//! in-memory page. A document reload opens a fresh page that shares the
//! session storage, the way a browser tab would.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use url::Url;

use reloader_client::{
    Outcome, PushMessage, Reconciler, log,
    protocol::EventStreamParser,
    reconcile::{Document, MemoryDocument, MemoryStorage},
};

use super::ReplayArgs;

type Page = Reconciler<Arc<MemoryStorage>, MemoryDocument>;

/// One handled message.
#[derive(Debug, Serialize)]
struct Report<'a> {
    /// Page load the message was delivered to (0 = first load)
    page: usize,
    id: &'a str,
    data: &'a str,
    #[serde(flatten)]
    outcome: Outcome,
}

/// Replay a captured stream and print what the page did.
pub fn replay_stream(args: &ReplayArgs) -> Result<()> {
    let body = read_input(args.input.as_deref())?;
    let location = Url::parse(&args.page)
        .with_context(|| format!("invalid page location {:?}", args.page))?;

    let messages = EventStreamParser::new().feed_messages(&body);
    log!("replay"; "{} message(s) against {}", messages.len(), location);

    let mut session = Session::new(location, &args.stylesheets);
    let mut stdout = std::io::stdout().lock();

    for message in &messages {
        let report = session.deliver(message);
        if args.json {
            writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
        } else {
            writeln!(stdout, "{}", describe(&report))?;
        }
    }
    stdout.flush()?;

    log!("replay"; "{} page load(s)", session.loads);
    for href in session.page.document().style_sheets().filter_map(|s| s.href) {
        log!("replay"; "stylesheet {}", href);
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
    }
}

/// Browser tab: one session storage, one live page at a time.
struct Session {
    storage: Arc<MemoryStorage>,
    location: Url,
    stylesheets: Vec<String>,
    page: Page,
    loads: usize,
}

impl Session {
    fn new(location: Url, stylesheets: &[String]) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let page = open_page(&storage, &location, stylesheets);
        Self {
            storage,
            location,
            stylesheets: stylesheets.to_vec(),
            page,
            loads: 1,
        }
    }

    fn deliver<'a>(&mut self, message: &'a PushMessage) -> Report<'a> {
        let page = self.loads - 1;
        let outcome = self.page.handle(message);
        if outcome == Outcome::DocumentReloaded {
            self.page = open_page(&self.storage, &self.location, &self.stylesheets);
            self.loads += 1;
        }
        Report {
            page,
            id: message.last_event_id.as_str(),
            data: &message.data,
            outcome,
        }
    }
}

fn open_page(storage: &Arc<MemoryStorage>, location: &Url, stylesheets: &[String]) -> Page {
    let mut document = MemoryDocument::new(location.clone());
    for href in stylesheets {
        document.add_link(href);
    }
    Reconciler::new(Arc::clone(storage), document)
}

fn describe(report: &Report<'_>) -> String {
    let action = match report.outcome {
        Outcome::Duplicate => "duplicate, dropped".to_string(),
        Outcome::Ignored => "not a signal, ignored".to_string(),
        Outcome::DocumentReloaded => "document reloaded".to_string(),
        Outcome::StylesReloaded { rewritten } => format!("{rewritten} stylesheet(s) reloaded"),
        Outcome::Unsubscribed => "page already reloading".to_string(),
    };
    format!(
        "[page {}] id={:?} data={:?}: {}",
        report.page, report.id, report.data, action
    )
}
