//! Client Reconciler
//!
//! Applies reload signals to a page. Native twin of the embedded
//! `client.js`: same dedup rules, same DOM effects, behind injected
//! capabilities so it runs outside a browser.
//!
//! # State Machine
//!
//! ```text
//!            duplicate id / unknown payload / "1"
//!              +-----------+
//!              v           |
//! (start) --> Idle --------+
//!              |
//!              | "0" (new id)
//!              v
//!         Unsubscribed  (document reloading, terminal)
//! ```
//!
//! The id of every new message is recorded before its payload is decoded,
//! so a replayed message is dropped even when it carried no known signal.
//!
//! # Modules
//!
//! - `clock` - `performance.now()` stand-ins
//! - `document` - Document capability and an in-memory page
//! - `storage` - Session storage and the last-seen id
//! - `stylesheet` - Same-origin stylesheet cache-busting

pub mod clock;
pub mod document;
pub mod storage;
pub mod stylesheet;


use serde::Serialize;
use tokio::sync::mpsc;

pub use clock::{Clock, FixedClock, MonotonicClock, format_timing};
pub use document::{Document, MemoryDocument, NodeId, StyleSheet};
pub use storage::{LastSeenId, MemoryStorage, SessionStorage};
pub use stylesheet::refresh_stylesheets;

use crate::debug;
use crate::protocol::{PushMessage, ReloadSignal};

/// What handling one message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Id equal to the last one recorded
    Duplicate,
    /// New id, payload is not a known signal
    Ignored,
    /// Unsubscribed and reload requested
    DocumentReloaded,
    /// Stylesheet hrefs rewritten
    StylesReloaded { rewritten: usize },
    /// Arrived after the page already started reloading
    Unsubscribed,
}

/// Reconciler bound to one page instance.
pub struct Reconciler<S, D, C = MonotonicClock> {
    last_seen: LastSeenId<S>,
    document: D,
    clock: C,
    subscribed: bool,
}

impl<S: SessionStorage, D: Document> Reconciler<S, D> {
    pub fn new(storage: S, document: D) -> Self {
        Self::with_clock(storage, document, MonotonicClock::new())
    }
}

impl<S: SessionStorage, D: Document, C: Clock> Reconciler<S, D, C> {
    pub fn with_clock(storage: S, document: D, clock: C) -> Self {
        Self {
            last_seen: LastSeenId::new(storage),
            document,
            clock,
            subscribed: true,
        }
    }

    /// Handle one message to completion.
    ///
    /// Never fails: malformed input is dropped.
    pub fn handle(&mut self, message: &PushMessage) -> Outcome {
        if !self.subscribed {
            return Outcome::Unsubscribed;
        }

        let id = &message.last_event_id;
        if self.last_seen.is_duplicate(id) {
            debug!("reload"; "duplicate event id {:?}", id.as_str());
            return Outcome::Duplicate;
        }
        self.last_seen.record(id);

        match message.signal() {
            Some(ReloadSignal::DocumentReload) => {
                self.subscribed = false;
                self.document.reload();
                Outcome::DocumentReloaded
            }
            Some(ReloadSignal::StyleReload) => {
                let timing = format_timing(self.clock.now());
                let rewritten = refresh_stylesheets(&mut self.document, &timing);
                debug!("reload"; "refreshed {} stylesheet(s)", rewritten);
                Outcome::StylesReloaded { rewritten }
            }
            None => {
                debug!("reload"; "ignoring payload of {} byte(s)", message.data.len());
                Outcome::Ignored
            }
        }
    }

    /// Run the subscription loop.
    ///
    /// Messages are handled strictly one after another in arrival order.
    /// Returns once the channel closes or a document reload unsubscribes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<PushMessage>) -> Self {
        while let Some(message) = rx.recv().await {
            if self.handle(&message) == Outcome::DocumentReloaded {
                rx.close();
                break;
            }
        }
        self
    }

    pub const fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn last_seen(&self) -> &LastSeenId<S> {
        &self.last_seen
    }

    pub fn into_document(self) -> D {
        self.document
    }
}
