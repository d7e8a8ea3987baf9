//! Reload Signal Protocol
//!
//! Two one-character signals carried over a Server-sent events stream. Every
//! message is tagged by the transport with an event id that the client uses
//! to drop redelivered messages.
//!
//! # Wire Vocabulary
//!
//! - `"0"`: reload the whole document
//! - `"1"`: re-request same-origin stylesheets
//!
//! Any other payload (wrong length or unknown character) is not a signal and
//! is ignored by clients, so servers may grow the vocabulary later.
//!
//! # Modules
//!
//! - `frame` - Encoding signals as `text/event-stream` frames
//! - `stream` - Incremental `text/event-stream` parser (the client side)

pub mod frame;
pub mod stream;

use std::fmt;
use std::sync::Arc;

pub use frame::{EventFrame, FrameError};
pub use stream::{EventStreamParser, StreamEvent};

/// Payload of a document reload signal.
pub const DOCUMENT_RELOAD_SIGNAL: &str = "0";

/// Payload of a stylesheet reload signal.
pub const CSS_RELOAD_SIGNAL: &str = "1";

/// Session storage key holding the last handled event id.
pub const LAST_EVENT_ID_KEY: &str = "reloader-client-last-reload-event-id";

/// Query parameter rewritten on stylesheet URLs to defeat caches.
pub const CACHE_BUST_PARAM: &str = "reload_timing";

/// A decoded reload signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadSignal {
    /// Full, cache-bypassing document reload
    DocumentReload,
    /// In-place stylesheet refresh
    StyleReload,
}

impl ReloadSignal {
    /// Decode a message payload.
    ///
    /// Returns `None` for anything that is not exactly one known character.
    pub fn decode(payload: &str) -> Option<Self> {
        match payload.as_bytes() {
            [b'0'] => Some(Self::DocumentReload),
            [b'1'] => Some(Self::StyleReload),
            _ => None,
        }
    }

    /// Wire payload for this signal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DocumentReload => DOCUMENT_RELOAD_SIGNAL,
            Self::StyleReload => CSS_RELOAD_SIGNAL,
        }
    }

    /// Character code of the payload (48 or 49).
    pub const fn code(self) -> u8 {
        self.as_str().as_bytes()[0]
    }

    /// Build the event-stream frame carrying this signal.
    pub fn frame(self, id: impl Into<EventId>) -> EventFrame {
        EventFrame::new(id, self.as_str())
    }
}

impl fmt::Display for ReloadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-supplied message id.
///
/// Opaque: only ever compared for equality, never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EventId(Arc<str>);

impl EventId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message as handed to the page's `message` handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub data: String,
    pub last_event_id: EventId,
}

impl PushMessage {
    pub fn new(data: impl Into<String>, last_event_id: impl Into<EventId>) -> Self {
        Self {
            data: data.into(),
            last_event_id: last_event_id.into(),
        }
    }

    /// Decode the payload as a reload signal.
    pub fn signal(&self) -> Option<ReloadSignal> {
        ReloadSignal::decode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_signals() {
        assert_eq!(ReloadSignal::decode("0"), Some(ReloadSignal::DocumentReload));
        assert_eq!(ReloadSignal::decode("1"), Some(ReloadSignal::StyleReload));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(ReloadSignal::decode(""), None);
        assert_eq!(ReloadSignal::decode("00"), None);
        assert_eq!(ReloadSignal::decode("01234 invalid data 56789"), None);
    }

    #[test]
    fn test_decode_rejects_unknown_character() {
        // next code after the stylesheet signal
        let next = char::from(ReloadSignal::StyleReload.code() + 1).to_string();
        assert_eq!(ReloadSignal::decode(&next), None);
        assert_eq!(ReloadSignal::decode("é"), None);
        assert_eq!(ReloadSignal::decode(" "), None);
    }

    #[test]
    fn test_signal_codes() {
        assert_eq!(ReloadSignal::DocumentReload.code(), 48);
        assert_eq!(ReloadSignal::StyleReload.code(), 49);
        assert_eq!(ReloadSignal::StyleReload.to_string(), CSS_RELOAD_SIGNAL);
    }

    #[test]
    fn test_event_id_equality_only() {
        let a = EventId::from("10");
        let b = EventId::from(String::from("10"));
        assert_eq!(a, b);
        assert_ne!(a, EventId::from("9"));
        assert_eq!(EventId::default().as_str(), "");
    }

    #[test]
    fn test_push_message_signal() {
        assert_eq!(
            PushMessage::new("1", "a").signal(),
            Some(ReloadSignal::StyleReload)
        );
        assert_eq!(PushMessage::new("x", "a").signal(), None);
    }
}
