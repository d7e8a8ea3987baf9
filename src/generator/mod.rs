//! Client script generator.
//!
//! Validates the endpoint serving Server-sent events and substitutes it into
//! the embedded client script.
//!
//! # Validation Order
//!
//! 1. exactly one argument
//! 2. a URL or a string
//! 3. strings must not be empty
//! 4. no fragment and no query (strings are resolved against
//!    `http://localhost:80` first, so relative paths are accepted)
//! 5. every percent escape decodes to UTF-8
//!
//! # Example
//!
//! ```ignore
//! let js = generator::generate(Url::parse("http://127.0.0.1:3001/sse")?)?;
//! let js = generator::generate("/sse")?;
//! ```

mod encode;
mod error;

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

pub use encode::{encode_uri, is_well_formed_uri};
pub use error::{ClientError, UrlComponent, inspect};

use crate::embed::{ClientVars, ScriptFlavor};

/// Base used to resolve relative endpoint strings for validation.
const VALIDATION_BASE: &str = "http://localhost:80";

static BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(VALIDATION_BASE).expect("validation base is a valid URL"));

static EVENT_SOURCE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"new EventSource\((?:'([^']*)'|"([^"]*)")\)"#).expect("valid regex")
});

/// Endpoint argument: a parsed URL or a raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Url(Url),
    Str(String),
}

impl From<Url> for Endpoint {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<&Url> for Endpoint {
    fn from(url: &Url) -> Self {
        Self::Url(url.clone())
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl Endpoint {
    /// Validate and return the text to substitute (before encoding).
    pub fn validate(&self) -> Result<String, ClientError> {
        let text = match self {
            Self::Url(url) => {
                reject_hash_and_search(url)?;
                url.as_str().to_string()
            }
            Self::Str(s) => {
                if s.is_empty() {
                    return Err(ClientError::EmptyUrl);
                }
                let resolved = BASE
                    .join(s)
                    .map_err(|source| ClientError::UnparsableUrl {
                        input: s.clone(),
                        source,
                    })?;
                reject_hash_and_search(&resolved)?;
                s.clone()
            }
        };

        if !is_well_formed_uri(&text) {
            return Err(ClientError::IncompatibleUri(text));
        }
        Ok(text)
    }
}

fn reject_hash_and_search(url: &Url) -> Result<(), ClientError> {
    let checks = [
        (UrlComponent::Hash, url.fragment().map(|f| format!("#{f}"))),
        (UrlComponent::Search, url.query().map(|q| format!("?{q}"))),
    ];

    for (component, value) in checks {
        // `#` or `?` alone count as absent
        if let Some(value) = value.filter(|v| v.len() > 1) {
            return Err(ClientError::DisallowedComponent {
                url: url.to_string(),
                component,
                value,
            });
        }
    }
    Ok(())
}

/// Render the minified client script for `endpoint`.
pub fn generate(endpoint: impl Into<Endpoint>) -> Result<String, ClientError> {
    generate_with(ScriptFlavor::Minified, endpoint)
}

/// Render the chosen script flavour for `endpoint`.
pub fn generate_with(
    flavor: ScriptFlavor,
    endpoint: impl Into<Endpoint>,
) -> Result<String, ClientError> {
    let text = endpoint.into().validate()?;
    let vars = ClientVars::new(encode_uri(&text));
    Ok(flavor.template().render(&vars))
}

/// Render from a variadic argument list, rejecting anything but one argument.
pub fn generate_from_args<I>(flavor: ScriptFlavor, args: I) -> Result<String, ClientError>
where
    I: IntoIterator<Item = Endpoint>,
{
    let mut args: Vec<Endpoint> = args.into_iter().collect();
    match args.len() {
        0 => Err(ClientError::MissingArgs),
        1 => generate_with(flavor, args.remove(0)),
        n => Err(ClientError::TooManyArgs(n)),
    }
}

/// Recover the endpoint substituted into a generated script.
pub fn extract_endpoint(script: &str) -> Option<&str> {
    let caps = EVENT_SOURCE_CALL.captures(script)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}
