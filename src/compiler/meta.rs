//! Page header and source records.
//!
//! `Header` is the typed form of a document's front matter: a handful of
//! recognized keys plus an open bag of everything else, which is handed to
//! templates verbatim as `page.<key>`.
//!
//! ```yaml
//! ---
//! title: Hello          # → extra["title"]
//! layout: post          # wrap the body in _layouts/post.html
//! path: blog/hello      # write _site/blog/hello/index.html
//! order: 2              # position in the group listing
//! hidden: true          # skip entirely
//! ---
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parsed front matter of one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Layout to wrap the rendered body in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Output directory override (written as `<path>/index.html`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Output location override; after the build pass it holds the computed url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Skip this document
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// `published: false` is the same as `hidden: true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    /// Explicit position within the group listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    /// Every other key, exposed to templates as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Whether the document is excluded from output and listings.
    pub fn is_skipped(&self) -> bool {
        self.hidden || self.published == Some(false)
    }

    /// Whether the header defines `key` with a non-null value.
    pub fn has_field(&self, key: &str) -> bool {
        match key {
            "layout" => self.layout.is_some(),
            "path" => self.path.is_some(),
            "url" => self.url.is_some(),
            "order" => self.order.is_some(),
            "published" => self.published.is_some(),
            "hidden" => true,
            _ => self.extra.get(key).is_some_and(|v| !v.is_null()),
        }
    }

    /// Copy of this header carrying the computed `url`.
    pub fn with_url(&self, url: &str) -> Self {
        Self {
            url: Some(url.to_owned()),
            ..self.clone()
        }
    }
}

/// One source document kept for rendering.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Logical name: `index.html` at the root, `posts/hello.md` in a group
    pub name: String,
    /// Header as written in the document
    pub header: Header,
    /// Computed url (override, or logical name without extension)
    pub url: String,
    /// Body after markup conversion, before rendering
    pub body: String,
}

impl SourceFile {
    /// Header exposed to templates as `page` and in sibling listings.
    pub fn page(&self) -> Header {
        self.header.with_url(&self.url)
    }

    /// Header-only documents produce no output.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Header {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reserved_and_extra_keys() {
        let header = parse("title: Hi\nlayout: base\norder: 3\ntags: [a, b]");

        assert_eq!(header.layout.as_deref(), Some("base"));
        assert_eq!(header.order, Some(3));
        assert!(!header.hidden);
        assert_eq!(header.extra.get("title"), Some(&Value::from("Hi")));
        assert!(header.extra.get("tags").unwrap().is_array());
        assert!(!header.extra.contains_key("layout"));
    }

    #[test]
    fn test_skip_flags() {
        assert!(parse("hidden: true").is_skipped());
        assert!(parse("published: false").is_skipped());
        assert!(!parse("published: true").is_skipped());
        assert!(!Header::default().is_skipped());
    }

    #[test]
    fn test_order_must_be_integer() {
        assert!(serde_yaml::from_str::<Header>("order: first").is_err());
    }

    #[test]
    fn test_serialize_is_flat() {
        let header = parse("title: Hi\nlayout: base").with_url("posts/hi");
        let value = serde_json::to_value(&header).unwrap();

        assert_eq!(value["title"], "Hi");
        assert_eq!(value["layout"], "base");
        assert_eq!(value["url"], "posts/hi");
        assert!(value.get("hidden").is_none());
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_has_field() {
        let header = parse("title: Hi\ndate: ~");
        assert!(header.has_field("title"));
        assert!(!header.has_field("date"));
        assert!(!header.has_field("layout"));
    }

    #[test]
    fn test_header_only_body() {
        let file = SourceFile {
            name: "posts/hello.md".into(),
            header: Header::default(),
            url: "posts/hello".into(),
            body: " \n\t".into(),
        };
        assert_eq!(file.page().url.as_deref(), Some("posts/hello"));
        assert!(!file.has_body());
    }
}
