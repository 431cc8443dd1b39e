//! Unified Result Model
//!
//! Every command maps what it found in the cache to this model before
//! rendering output.

use serde::{Deserialize, Serialize};

use crate::cache::module::CacheModule;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Module,
    Origin,
    Unresolved,
    Graph,
    Status,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Content hash (the on-disk file name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Whether the excerpt was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheError {
    pub code: String,
    pub message: String,
}

impl CacheError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Filesystem path of the cached file, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Logical URL of the module (or origin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The specifier this item was resolved from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifier: Option<String>,

    /// Excerpt of the module source (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured data payload for commands like graph/doctor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CacheError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            url: None,
            specifier: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a result for a resolved cache module
    pub fn module(module: &CacheModule) -> Self {
        let mut item = Self::empty(Kind::Module);
        item.path = Some(crate::core::paths::normalize_path(module.filepath()));
        item.url = Some(module.url().to_string());
        item.meta.hash = Some(module.hash().to_string());
        item
    }

    /// Create a result for an origin directory
    pub fn origin(origin: impl Into<String>, dir: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Origin);
        item.url = Some(origin.into());
        item.path = Some(dir.into());
        item
    }

    /// Create a result for a specifier that did not resolve
    pub fn unresolved(specifier: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Unresolved);
        item.specifier = Some(specifier.into());
        item
    }

    /// Create a graph node result
    pub fn graph(url: impl Into<String>, data: serde_json::Value) -> Self {
        let mut item = Self::empty(Kind::Graph);
        item.url = Some(url.into());
        item.data = Some(data);
        item
    }

    /// Create a status report result (doctor)
    pub fn status(excerpt: impl Into<String>, data: serde_json::Value) -> Self {
        let mut item = Self::empty(Kind::Status);
        item.excerpt = Some(excerpt.into());
        item.data = Some(data);
        item
    }

    /// Create a new error result
    pub fn error(error: CacheError) -> Self {
        let mut item = Self::empty(Kind::Error);
        item.errors.push(error);
        item
    }

    /// Set the specifier
    pub fn with_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.specifier = Some(specifier.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add an error
    pub fn with_error(mut self, error: CacheError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by url then path for stable output
    pub fn sort(&mut self) {
        self.items
            .sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.path.cmp(&b.path)));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_serialization() {
        let item = ResultItem::unresolved("./missing.ts");
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["kind"], "unresolved");
        assert_eq!(json["specifier"], "./missing.ts");
        assert!(json.get("path").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_error_item() {
        let item = ResultItem::error(CacheError::new("CODE", "message"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "CODE");
    }

    #[test]
    fn test_origin_item() {
        let item = ResultItem::origin("https://deno.land", "/cache/https/deno.land");
        assert_eq!(item.kind, Kind::Origin);
        assert_eq!(item.url.as_deref(), Some("https://deno.land"));
    }

    #[test]
    fn test_result_set_sort() {
        let mut set: ResultSet = vec![
            ResultItem::origin("https://b.com", "/c/https/b.com"),
            ResultItem::origin("https://a.com", "/c/https/a.com"),
        ]
        .into_iter()
        .collect();
        set.sort();

        let urls: Vec<_> = set.items.iter().map(|i| i.url.clone().unwrap()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_result_set_len() {
        let mut set = ResultSet::new();
        assert!(set.is_empty());
        set.extend(vec![ResultItem::unresolved("a"), ResultItem::unresolved("b")]);
        assert_eq!(set.len(), 2);
    }
}
