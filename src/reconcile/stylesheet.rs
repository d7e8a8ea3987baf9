//! In-place stylesheet refresh.
//!
//! Same-origin `<link>` stylesheets get a fresh `reload_timing` query value,
//! which makes the browser refetch them without reloading the page.
//! Cross-origin, inline and detached sheets are left untouched.

use smallvec::SmallVec;
use url::Url;

use super::document::{Document, StyleSheet};
use crate::debug;
use crate::protocol::CACHE_BUST_PARAM;

/// Rewrite every eligible stylesheet href. Returns the number rewritten.
pub fn refresh_stylesheets<D: Document>(document: &mut D, timing: &str) -> usize {
    // Snapshot before writing hrefs: a live list may reorder while we mutate it.
    let sheets: SmallVec<[StyleSheet; 8]> = document.style_sheets().collect();
    let page = document.location().clone();
    let mut rewritten = 0;

    for sheet in sheets {
        let (Some(node), Some(href)) = (sheet.owner_node, sheet.href) else {
            continue;
        };

        let Ok(mut url) = page.join(&href) else {
            debug!("reload"; "skipping unparsable stylesheet href {}", href);
            continue;
        };

        if !same_host(&url, &page) {
            continue;
        }

        set_query_param(&mut url, CACHE_BUST_PARAM, timing);
        document.set_href(node, url.into());
        rewritten += 1;
    }

    rewritten
}

/// Compare `host` the way `location.host` does: hostname plus non-default port.
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

/// `URLSearchParams.set`: replace the first `name` pair in place, drop the
/// remaining ones, append when absent.
pub fn set_query_param(url: &mut Url, name: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;

    for (key, val) in url.query_pairs() {
        if key == name {
            if !replaced {
                pairs.push((key.into_owned(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), val.into_owned()));
        }
    }
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}
