//! Incremental `text/event-stream` parser.
//!
//! Follows the event-stream interpretation rules browsers apply before a
//! message reaches `EventSource.onmessage`:
//!
//! - lines end in CRLF, LF or CR, possibly split across chunks
//! - a leading byte order mark is skipped
//! - `:` starts a comment line
//! - the last event id survives across events and reconnects
//! - a blank line dispatches, unless no data was buffered

use std::mem;
use std::time::Duration;

use super::{EventId, PushMessage};

/// Event type used when a frame has no `event:` field.
pub const DEFAULT_EVENT_TYPE: &str = "message";

const BOM: char = '\u{feff}';

/// A dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub event_type: String,
    pub data: String,
    pub last_event_id: EventId,
}

impl StreamEvent {
    /// True for events delivered to an `onmessage` handler.
    pub fn is_message(&self) -> bool {
        self.event_type == DEFAULT_EVENT_TYPE
    }

    /// Convert into the message a page sees, dropping named events.
    pub fn into_message(self) -> Option<PushMessage> {
        self.is_message().then(|| PushMessage {
            data: self.data,
            last_event_id: self.last_event_id,
        })
    }
}

/// Stateful parser fed with raw response bytes.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    line: Vec<u8>,
    /// Previous byte was CR; a following LF belongs to the same terminator
    pending_cr: bool,
    started: bool,
    data: String,
    event_type: String,
    last_event_id: EventId,
    retry: Option<Duration>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        for &byte in chunk {
            if mem::take(&mut self.pending_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\r' => {
                    self.pending_cr = true;
                    self.end_line(&mut events);
                }
                b'\n' => self.end_line(&mut events),
                _ => self.line.push(byte),
            }
        }

        events
    }

    /// Feed a chunk and keep only `message` events.
    pub fn feed_messages(&mut self, chunk: &[u8]) -> Vec<PushMessage> {
        self.feed(chunk)
            .into_iter()
            .filter_map(StreamEvent::into_message)
            .collect()
    }

    /// Drop partial state after the connection is lost.
    ///
    /// The last event id and retry delay are kept: a reconnecting client
    /// sends the id back as `Last-Event-ID` and the server may replay from it.
    pub fn reconnect(&mut self) {
        self.line.clear();
        self.pending_cr = false;
        self.started = false;
        self.data.clear();
        self.event_type.clear();
    }

    /// Last event id seen on the stream.
    pub fn last_event_id(&self) -> &EventId {
        &self.last_event_id
    }

    /// Reconnect delay requested by the server.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn end_line(&mut self, events: &mut Vec<StreamEvent>) {
        let raw = mem::take(&mut self.line);
        let decoded = String::from_utf8_lossy(&raw);

        let line = if mem::replace(&mut self.started, true) {
            decoded.as_ref()
        } else {
            decoded.strip_prefix(BOM).unwrap_or(&decoded)
        };

        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        match line.split_once(':') {
            Some((field, value)) => {
                let value = value.strip_prefix(' ').unwrap_or(value);
                self.process_field(field, value);
            }
            None => self.process_field(line, ""),
        }
    }

    fn process_field(&mut self, field: &str, value: &str) {
        match field {
            "event" => self.event_type = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = EventId::new(value);
                }
            }
            "retry" => {
                if !value.is_empty()
                    && value.bytes().all(|b| b.is_ascii_digit())
                    && let Ok(ms) = value.parse::<u64>()
                {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, events: &mut Vec<StreamEvent>) {
        let event_type = mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return;
        }

        let mut data = mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        events.push(StreamEvent {
            event_type: if event_type.is_empty() {
                DEFAULT_EVENT_TYPE.to_string()
            } else {
                event_type
            },
            data,
            last_event_id: self.last_event_id.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ReloadSignal;

    #[test]
    fn test_single_frame() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"retry:10\nid:first\ndata:0\n\n");

        assert_eq!(messages, vec![PushMessage::new("0", "first")]);
        assert_eq!(parser.retry(), Some(Duration::from_millis(10)));
        assert_eq!(parser.last_event_id().as_str(), "first");
    }

    #[test]
    fn test_encoded_frame_parses_back() {
        let wire = ReloadSignal::StyleReload
            .frame("fourth")
            .with_retry(10)
            .encode()
            .unwrap();
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(wire.as_bytes());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].signal(), Some(ReloadSignal::StyleReload));
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut parser = EventStreamParser::new();
        assert!(parser.feed(b"id:a\r").is_empty());
        assert!(parser.feed(b"\ndata:1\r").is_empty());
        let events = parser.feed(b"\n\r\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "1");
        assert_eq!(events[0].last_event_id.as_str(), "a");
    }

    #[test]
    fn test_cr_only_line_endings() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"id:x\rdata:0\r\r");
        assert_eq!(messages, vec![PushMessage::new("0", "x")]);
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let mut parser = EventStreamParser::new();
        let mut input = "\u{feff}".as_bytes().to_vec();
        input.extend_from_slice(b"data:1\n\n");
        let messages = parser.feed_messages(&input);
        assert_eq!(messages, vec![PushMessage::new("1", "")]);
    }

    #[test]
    fn test_comments_and_unknown_fields_ignored() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b": keep-alive\nfoo:bar\ndata:0\n\n");
        assert_eq!(messages, vec![PushMessage::new("0", "")]);
    }

    #[test]
    fn test_multiline_data_joined_with_lf() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"data: a\ndata:b\n\n");
        assert_eq!(messages[0].data, "a\nb");
    }

    #[test]
    fn test_last_event_id_persists_between_events() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"id:7\ndata:0\n\ndata:1\n\n");
        assert_eq!(messages[1].last_event_id.as_str(), "7");
    }

    #[test]
    fn test_id_with_nul_is_ignored() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"id:ok\ndata:0\n\nid:b\0d\ndata:1\n\n");
        assert_eq!(messages[1].last_event_id.as_str(), "ok");
    }

    #[test]
    fn test_blank_without_data_does_not_dispatch() {
        let mut parser = EventStreamParser::new();
        assert!(parser.feed(b"id:only\n\n").is_empty());
        assert_eq!(parser.last_event_id().as_str(), "only");
    }

    #[test]
    fn test_named_events_are_not_messages() {
        let mut parser = EventStreamParser::new();
        let events = parser.feed(b"event:ping\ndata:0\n\ndata:1\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "ping");
        assert!(!events[0].is_message());
        assert!(events[1].is_message());

        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"event:ping\ndata:0\n\ndata:1\n\n");
        assert_eq!(messages, vec![PushMessage::new("1", "")]);
    }

    #[test]
    fn test_invalid_retry_ignored() {
        let mut parser = EventStreamParser::new();
        parser.feed(b"retry:1s\n");
        assert_eq!(parser.retry(), None);
    }

    #[test]
    fn test_reconnect_keeps_last_event_id() {
        let mut parser = EventStreamParser::new();
        parser.feed(b"id:third\ndata:2\n\ndata:partial");
        parser.reconnect();
        assert_eq!(parser.last_event_id().as_str(), "third");

        // replayed event after reconnect carries the same id
        let messages = parser.feed_messages(b"id:third\ndata:0\n\n");
        assert_eq!(messages, vec![PushMessage::new("0", "third")]);
    }

    #[test]
    fn test_data_field_without_colon() {
        let mut parser = EventStreamParser::new();
        let messages = parser.feed_messages(b"data\n\n");
        assert_eq!(messages, vec![PushMessage::new("", "")]);
    }
}
