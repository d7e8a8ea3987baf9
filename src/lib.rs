//! Live-reload browser client for Server-sent events.
//!
//! A dev server pushes one-character signals over an event stream; the
//! client embedded in each page either reloads the whole document (`"0"`)
//! or re-requests its same-origin stylesheets in place (`"1"`).
//!
//! # Modules
//!
//! | Module      | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `protocol`  | Signal vocabulary, SSE frame encoding and parsing    |
//! | `reconcile` | Applies signals to a page (native client twin)       |
//! | `generator` | Validates an endpoint and renders the client script  |
//! | `embed`     | Embedded client script templates                     |
//! | `config`    | `reloader.toml`                                      |
//! | `logger`    | `log!`/`debug!` terminal output                      |
//!
//! # Example
//!
//! ```ignore
//! use reloader_client::generator;
//!
//! let script = generator::generate("/sse")?;
//! ```

pub mod config;
pub mod embed;
pub mod generator;
pub mod logger;
pub mod protocol;
pub mod reconcile;

pub use generator::{ClientError, Endpoint, generate, generate_with};
pub use protocol::{EventId, PushMessage, ReloadSignal};
pub use reconcile::{Outcome, Reconciler};
