//! Embedded browser script.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `client.js` - The reconciler that runs in the page
//!
//! Two flavours of the same script are embedded: the readable source and a
//! build-time minified copy (see `build.rs`). Both carry a single
//! `EVENT_SOURCE_URL` placeholder.
//!
//! # Usage
//!
//! ```ignore
//! use embed::{ClientVars, ScriptFlavor};
//!
//! let js = ScriptFlavor::Minified.template().render(&ClientVars::new("/sse"));
//! ```

mod template;

pub use template::{Template, TemplateVars};

/// Placeholder substituted with the encoded endpoint URL.
pub const EVENT_SOURCE_URL_PLACEHOLDER: &str = "EVENT_SOURCE_URL";

/// Variables for client.js.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientVars {
    /// Already percent-encoded endpoint URL.
    pub event_source_url: String,
}

impl ClientVars {
    pub fn new(event_source_url: impl Into<String>) -> Self {
        Self {
            event_source_url: event_source_url.into(),
        }
    }
}

impl TemplateVars for ClientVars {
    fn apply(&self, content: &str) -> String {
        content.replacen(EVENT_SOURCE_URL_PLACEHOLDER, &self.event_source_url, 1)
    }
}

/// Readable client script.
pub const CLIENT_JS: Template<ClientVars> = Template::new(include_str!("client.js"));

/// Minified client script.
pub const CLIENT_MIN_JS: Template<ClientVars> =
    Template::new(include_str!(concat!(env!("OUT_DIR"), "/client.min.js")));

/// Which copy of the client script to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScriptFlavor {
    #[default]
    Minified,
    Readable,
}

impl ScriptFlavor {
    pub const fn from_minify(minify: bool) -> Self {
        if minify { Self::Minified } else { Self::Readable }
    }

    pub const fn template(self) -> &'static Template<ClientVars> {
        match self {
            Self::Minified => &CLIENT_MIN_JS,
            Self::Readable => &CLIENT_JS,
        }
    }
}
