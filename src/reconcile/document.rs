//! Document capability used by the reconciler.
//!
//! The reconciler never touches a DOM directly. It reads the page location,
//! snapshots the stylesheet list, rewrites `<link>` hrefs and triggers a
//! reload through this trait.

use url::Url;

/// Handle to a DOM node owning a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One entry of `document.styleSheets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    /// Absolute URL, `None` for inline `<style>` sheets
    pub href: Option<String>,
    /// Owning `<link>`/`<style>` node, `None` for detached or imported sheets
    pub owner_node: Option<NodeId>,
}

/// The page a reconciler is attached to.
pub trait Document {
    /// Current page URL (`location`).
    fn location(&self) -> &Url;

    /// Stylesheets currently attached, in document order.
    ///
    /// May be backed by a live list; callers snapshot it before mutating.
    fn style_sheets(&self) -> impl Iterator<Item = StyleSheet> + '_;

    /// Assign `href` on an owner node, making the browser refetch it.
    fn set_href(&mut self, node: NodeId, href: String);

    /// Force a full, cache-bypassing reload.
    fn reload(&mut self);
}

#[derive(Debug, Clone)]
struct LinkNode {
    node: Option<NodeId>,
    href: Option<String>,
}

/// In-memory document.
///
/// Records reloads and href assignments so tests and replays can inspect
/// what a page would have done.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    location: Url,
    title: String,
    sheets: Vec<LinkNode>,
    next_node: usize,
    reloads: usize,
    href_writes: usize,
}

impl MemoryDocument {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            title: String::new(),
            sheets: Vec::new(),
            next_node: 0,
            reloads: 0,
            href_writes: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Append `<link rel="stylesheet" href=...>`. Relative hrefs are
    /// resolved against the page location like a browser does.
    pub fn add_link(&mut self, href: &str) -> NodeId {
        let resolved = self
            .location
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string());
        let node = self.alloc_node();
        self.sheets.push(LinkNode {
            node: Some(node),
            href: Some(resolved),
        });
        node
    }

    /// Append an inline `<style>` element.
    pub fn add_inline_style(&mut self) -> NodeId {
        let node = self.alloc_node();
        self.sheets.push(LinkNode {
            node: Some(node),
            href: None,
        });
        node
    }

    /// Append a sheet with an href but no owner node (e.g. `@import`).
    pub fn add_detached_sheet(&mut self, href: &str) {
        self.sheets.push(LinkNode {
            node: None,
            href: Some(href.to_string()),
        });
    }

    pub fn href(&self, node: NodeId) -> Option<&str> {
        self.sheets
            .iter()
            .find(|sheet| sheet.node == Some(node))
            .and_then(|sheet| sheet.href.as_deref())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn reloads(&self) -> usize {
        self.reloads
    }

    pub const fn href_writes(&self) -> usize {
        self.href_writes
    }

    fn alloc_node(&mut self) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        node
    }
}

impl Document for MemoryDocument {
    fn location(&self) -> &Url {
        &self.location
    }

    fn style_sheets(&self) -> impl Iterator<Item = StyleSheet> + '_ {
        self.sheets.iter().map(|sheet| StyleSheet {
            href: sheet.href.clone(),
            owner_node: sheet.node,
        })
    }

    fn set_href(&mut self, node: NodeId, href: String) {
        if let Some(sheet) = self.sheets.iter_mut().find(|sheet| sheet.node == Some(node)) {
            sheet.href = Some(href);
            self.href_writes += 1;
        }
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}
