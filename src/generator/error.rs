//! Generator error types.

use std::fmt;

use thiserror::Error;

/// URL component that must be absent from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlComponent {
    Hash,
    Search,
}

impl fmt::Display for UrlComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hash => "hash",
            Self::Search => "search parameter",
        })
    }
}

/// Rejected endpoint argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Expected 1 argument (<string|URL>), but got no arguments.")]
    MissingArgs,

    #[error("Expected 1 argument (<string|URL>), but got {0} arguments.")]
    TooManyArgs(usize),

    /// Carries a description of the offending value and its kind
    #[error(
        "Expected a URL of the resource serving Server-sent events (<string|URL>), but got {0}."
    )]
    InvalidArgType(String),

    #[error(
        "Expected a URL of the resource serving Server-sent events which must not be empty, but got '' (empty string)."
    )]
    EmptyUrl,

    #[error(
        "Expected URL to have no hash and search parameter, but got {} whose {component} is {}.",
        inspect(.url),
        inspect(.value)
    )]
    DisallowedComponent {
        url: String,
        component: UrlComponent,
        value: String,
    },

    #[error(
        "Expected a URL of the resource serving Server-sent events, but received an RFC 3986 incompatible URI {}. In short, RFC 3986 says that a URI must be a UTF-8 sequence. https://tools.ietf.org/html/rfc3986",
        inspect(.0)
    )]
    IncompatibleUri(String),

    #[error(
        "Expected a URL of the resource serving Server-sent events, but got an unparsable URL {} ({source}).",
        inspect(.input)
    )]
    UnparsableUrl {
        input: String,
        source: url::ParseError,
    },
}

impl ClientError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingArgs => "ERR_MISSING_ARGS",
            Self::TooManyArgs(_) => "ERR_TOO_MANY_ARGS",
            Self::InvalidArgType(_) => "ERR_INVALID_ARG_TYPE",
            Self::EmptyUrl | Self::DisallowedComponent { .. } => "ERR_INVALID_ARG_VALUE",
            Self::IncompatibleUri(_) | Self::UnparsableUrl { .. } => "ERR_INVALID_URL",
        }
    }
}

/// Quote a string for an error message.
///
/// Single quotes unless the value contains one, then double quotes, then
/// backticks; control characters are escaped.
pub fn inspect(s: &str) -> String {
    let quote = ['\'', '"', '`']
        .into_iter()
        .find(|q| !s.contains(*q))
        .unwrap_or('\'');

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
