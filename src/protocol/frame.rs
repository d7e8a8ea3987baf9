//! Event-stream frame encoding.
//!
//! ```text
//! retry:10
//! id:fourth
//! data:1
//!
//! ```

use std::fmt::Write;

use thiserror::Error;

use super::EventId;

/// Errors raised while encoding a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("event id {0:?} cannot be framed: it contains a line break or NUL")]
    InvalidId(String),
}

/// A single `text/event-stream` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    pub id: EventId,
    pub data: String,
    /// Reconnect delay in milliseconds
    pub retry: Option<u32>,
}

impl EventFrame {
    pub fn new(id: impl Into<EventId>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            retry: None,
        }
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Serialize to the wire format.
    ///
    /// Multi-line data is split over several `data:` lines so the client
    /// reassembles it with `\n` separators.
    pub fn encode(&self) -> Result<String, FrameError> {
        let id = self.id.as_str();
        if id.contains(['\r', '\n', '\0']) {
            return Err(FrameError::InvalidId(id.to_string()));
        }

        let mut out = String::with_capacity(self.data.len() + id.len() + 24);
        if let Some(retry) = self.retry {
            let _ = writeln!(out, "retry:{retry}");
        }
        let _ = writeln!(out, "id:{id}");
        for line in data_lines(&self.data) {
            let _ = writeln!(out, "data:{line}");
        }
        out.push('\n');
        Ok(out)
    }
}

/// Split on any event-stream line terminator (CRLF, LF, CR).
fn data_lines(data: &str) -> impl Iterator<Item = &str> {
    data.split("\r\n").flat_map(|s| s.split(['\n', '\r']))
}
