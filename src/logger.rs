//! Logging utilities with colored output.
//!
//! Everything goes to stderr: stdout carries generated scripts and frames,
//! so it must stay clean for piping.
//!
//! # Example
//!
//! ```ignore
//! log!("generate"; "wrote {}", path.display());
//! debug!("reload"; "skipping stylesheet without href");
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
///
/// Honors the `--color` override and stderr TTY detection.
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    let paint = |p: &String| -> String {
        match module.to_ascii_lowercase().as_str() {
            "generate" => p.bright_green().bold().to_string(),
            "signal" => p.bright_blue().bold().to_string(),
            "replay" | "reload" => p.bright_cyan().bold().to_string(),
            "error" => p.bright_red().bold().to_string(),
            _ => p.bright_yellow().bold().to_string(),
        }
    };
    prefix.if_supports_color(Stream::Stderr, paint).to_string()
}

// ============================================================================
// tests
// ============================================================================
