//! Front matter extraction and markup conversion.
//!
//! A document may open with a YAML block between two `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! layout: post
//! ---
//! <p>{{ page.title }}</p>
//! ```
//!
//! Documents without that block have an empty header and are all body.
//! An opening marker without a closing one is an error: silently treating
//! the rest of the file as header would swallow the page.

use super::meta::Header;
use crate::config::defaults::{HEADER_MARKER, MARKDOWN_EXTENSION, PAGE_EXTENSION};
use crate::error::BuildError;
use anyhow::{Context, Result, bail};
use pulldown_cmark::{Options, Parser, html::push_html};
use std::{fs, path::Path};

/// Source formats the pipeline can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Body used verbatim
    Html,
    /// Body converted to HTML before rendering
    Markdown,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match extension {
            PAGE_EXTENSION => Ok(Self::Html),
            MARKDOWN_EXTENSION => Ok(Self::Markdown),
            _ => bail!(BuildError::UnsupportedSourceType {
                path: path.to_path_buf(),
                extension: extension.to_owned(),
            }),
        }
    }
}

/// Read a source document and split it into header and body.
///
/// Markdown bodies come back already converted to HTML.
pub fn read_source(path: &Path) -> Result<(Header, String)> {
    let kind = SourceKind::from_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_source(&text, kind, path)
}

/// Split already-loaded text. `path` is only used in diagnostics.
pub fn parse_source(text: &str, kind: SourceKind, path: &Path) -> Result<(Header, String)> {
    let (raw, body) = split_header(text, path)?;
    let header = parse_header(raw, path)?;
    let body = match kind {
        SourceKind::Html => body.to_owned(),
        SourceKind::Markdown => render_markdown(body),
    };
    Ok((header, body))
}

/// Locate the header block.
///
/// Returns the raw header text (if any) and the body. The header must be the
/// first non-blank line of the document; the line break after the closing
/// marker belongs to neither part.
pub fn split_header<'a>(text: &'a str, path: &Path) -> Result<(Option<&'a str>, &'a str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut offset = 0;
    let mut header_start = None;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        match header_start {
            None if line.trim().is_empty() => {}
            None if is_marker(line) => header_start = Some(offset),
            None => return Ok((None, text)),
            Some(from) if is_marker(line) => return Ok((Some(&text[from..start]), &text[offset..])),
            Some(_) => {}
        }
    }

    match header_start {
        Some(_) => bail!(BuildError::MalformedHeader(path.to_path_buf())),
        None => Ok((None, text)),
    }
}

#[inline]
fn is_marker(line: &str) -> bool {
    line.trim_end() == HEADER_MARKER
}

/// Parse the YAML between the markers. Empty blocks give the default header.
fn parse_header(raw: Option<&str>, path: &Path) -> Result<Header> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Header::default());
    };

    let value: serde_yaml::Value = serde_yaml::from_str(raw)
        .with_context(|| format!("Invalid header in {}", path.display()))?;
    if value.is_null() {
        return Ok(Header::default());
    }

    serde_yaml::from_value(value).with_context(|| format!("Invalid header in {}", path.display()))
}

/// Convert markdown to HTML.
///
/// Tables, footnotes, definition lists and heading attributes
/// (`# Title {#id .class}`) are enabled; raw HTML passes through unchanged.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut html = String::with_capacity(content.len() * 3 / 2);
    push_html(&mut html, Parser::new_ext(content, options));
    html
}
