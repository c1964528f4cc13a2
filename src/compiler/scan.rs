//! Source discovery: the first build pass.
//!
//! Expands the `files` list into an ordered list of [`SourceFile`]s and
//! fills the per-group [`Listings`] at the same time, before anything is
//! rendered.
//!
//! # Expansion
//!
//! ```text
//! files:
//!   - index.html            → index.html                (root)
//!   - posts:
//!       - first.md          → posts/first.md            (_posts/first.md)
//!       - "*.md"            → posts/<every .md in _posts, listing order>
//! ```
//!
//! A name already seen in the same group is dropped silently, so
//! `[first.md, "*.md"]` pins `first.md` to the front without duplicating it.
//! Hidden and header-only documents are parsed (and must parse) but are
//! neither rendered nor listed.

use super::frontmatter::read_source;
use super::meta::SourceFile;
use super::output::page_url;
use crate::config::{FileSpec, SitePaths};
use crate::data::Listings;
use crate::error::BuildError;
use anyhow::{Context, Result, bail};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};
use walkdir::WalkDir;

/// Result of the scan pass.
#[derive(Debug)]
pub struct ScanResult {
    /// Kept sources, in scan order
    pub files: Vec<SourceFile>,
    /// Sibling listings per group
    pub listings: Listings,
    /// Sources parsed but not kept (hidden or header-only)
    pub skipped: usize,
}

/// Walks the `files` list, owning the per-group deduplication sets.
pub struct SourceScanner<'a> {
    paths: &'a SitePaths,
    required_fields: &'a [String],
    /// Names seen so far, per group (`None` for the root)
    seen: HashMap<Option<String>, HashSet<String>>,
    result: ScanResult,
}

impl<'a> SourceScanner<'a> {
    pub fn new(paths: &'a SitePaths, required_fields: &'a [String]) -> Self {
        Self {
            paths,
            required_fields,
            seen: HashMap::new(),
            result: ScanResult {
                files: Vec::new(),
                listings: Listings::new(),
                skipped: 0,
            },
        }
    }

    /// Scan every file specification in order.
    pub fn scan(mut self, specs: &[FileSpec]) -> Result<ScanResult> {
        for spec in specs {
            match spec {
                FileSpec::File(file) => self.add(None, file)?,
                FileSpec::Group(_) => {
                    let Some((group, entries)) = spec.as_group() else {
                        continue;
                    };
                    self.result.listings.ensure_group(group);
                    for file in expand_group(&self.paths.group_dir(group), entries)? {
                        self.add(Some(group), &file)?;
                    }
                }
            }
        }
        Ok(self.result)
    }

    /// Parse one candidate and keep it unless it is a duplicate, hidden or
    /// header-only.
    fn add(&mut self, group: Option<&str>, file: &str) -> Result<()> {
        let first_seen = self
            .seen
            .entry(group.map(str::to_owned))
            .or_default()
            .insert(file.to_owned());
        if !first_seen {
            return Ok(());
        }

        let name = match group {
            Some(group) => format!("{group}/{file}"),
            None => file.to_owned(),
        };
        let source = self.paths.source_path(group, file);
        let (header, body) =
            read_source(&source).with_context(|| format!("Failed to load `{name}`"))?;

        if header.is_skipped() || body.trim().is_empty() {
            self.result.skipped += 1;
            return Ok(());
        }

        if let Some(field) = self.required_fields.iter().find(|f| !header.has_field(f)) {
            bail!(BuildError::MissingRequiredField {
                name,
                field: field.clone(),
            });
        }

        let url = page_url(&name, &header);
        let file = SourceFile {
            name,
            header,
            url,
            body,
        };
        if let Some(group) = group {
            self.result.listings.insert(group, file.page());
        }
        self.result.files.push(file);
        Ok(())
    }
}

/// Resolve a group's entries into candidate file names, in order.
///
/// Duplicates are left in; the scanner drops them.
fn expand_group(dir: &Path, entries: &[String]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in entries {
        match wildcard_extension(entry) {
            Some(extension) => names.extend(list_by_extension(dir, extension)?),
            None => names.push(entry.clone()),
        }
    }
    Ok(names)
}

/// `*.md` → `Some("md")`; anything else is a literal name.
fn wildcard_extension(entry: &str) -> Option<&str> {
    entry
        .strip_prefix("*.")
        .filter(|ext| !ext.is_empty() && !ext.contains(['*', '/', '\\']))
}

/// Files of one extension directly inside `dir`, in filesystem listing order.
pub fn list_by_extension(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn site(files: &[(&str, &str)]) -> (TempDir, SitePaths) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let paths = SitePaths::new(dir.path());
        (dir, paths)
    }

    fn scan(paths: &SitePaths, config: &str) -> Result<ScanResult> {
        let config = SiteConfig::from_yaml(config).unwrap();
        SourceScanner::new(paths, &config.required_fields).scan(config.files())
    }

    fn names(result: &ScanResult) -> Vec<&str> {
        result.files.iter().map(|f| f.name.as_str()).collect()
    }

    fn listing(result: &ScanResult, group: &str) -> Vec<String> {
        result
            .listings
            .iter()
            .find(|(name, _)| *name == group)
            .map(|(_, list)| list.iter().filter_map(|h| h.url.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_literal_root_file() {
        let (_dir, paths) = site(&[("index.html", "---\ntext: Hi\n---\n{{page.text}}")]);
        let result = scan(&paths, "files: [index.html]").unwrap();

        assert_eq!(names(&result), ["index.html"]);
        assert_eq!(result.files[0].url, "index");
        assert_eq!(result.listings.len(), 0);
    }

    #[test]
    fn test_group_literals_and_listing() {
        let (_dir, paths) = site(&[
            ("_posts/a.html", "---\ntitle: A\n---\nA"),
            ("_posts/b.md", "---\ntitle: B\n---\nB"),
        ]);
        let result = scan(&paths, "files: [{posts: [b.md, a.html]}]").unwrap();

        assert_eq!(names(&result), ["posts/b.md", "posts/a.html"]);
        assert_eq!(listing(&result, "posts"), ["posts/b", "posts/a"]);
    }

    #[test]
    fn test_duplicates_dropped() {
        let (_dir, paths) = site(&[
            ("_posts/a.html", "A"),
            ("_posts/b.html", "B"),
        ]);
        let result = scan(&paths, "files: [{posts: [b.html, \"*.html\", b.html]}]").unwrap();

        assert_eq!(result.files[0].name, "posts/b.html");
        assert_eq!(result.files.len(), 2);
        assert_eq!(listing(&result, "posts").len(), 2);
    }

    #[test]
    fn test_same_name_in_different_groups_kept() {
        let (_dir, paths) = site(&[
            ("_posts/a.html", "A"),
            ("_notes/a.html", "A"),
            ("a.html", "A"),
        ]);
        let result = scan(&paths, "files: [a.html, {posts: [a.html]}, {notes: [a.html]}]").unwrap();
        assert_eq!(names(&result), ["a.html", "posts/a.html", "notes/a.html"]);
    }

    #[test]
    fn test_repeated_group_extends_listing() {
        let (_dir, paths) = site(&[("_posts/a.html", "A"), ("_posts/b.html", "B")]);
        let result = scan(&paths, "files: [{posts: [a.html]}, {posts: [a.html, b.html]}]").unwrap();
        assert_eq!(listing(&result, "posts"), ["posts/a", "posts/b"]);
    }

    #[test]
    fn test_wildcard_selects_one_extension() {
        let (_dir, paths) = site(&[
            ("_posts/a.md", "A"),
            ("_posts/b.md", "B"),
            ("_posts/c.html", "C"),
            ("_posts/d.txt", "D"),
            ("_posts/nested/e.md", "E"),
        ]);
        let result = scan(&paths, "files: [{posts: [\"*.md\"]}]").unwrap();

        let mut found = names(&result);
        found.sort_unstable();
        assert_eq!(found, ["posts/a.md", "posts/b.md"]);
    }

    #[test]
    fn test_wildcard_follows_listing_order() {
        let (dir, paths) = site(&[
            ("_posts/a.html", "A"),
            ("_posts/b.html", "B"),
            ("_posts/c.html", "C"),
        ]);
        let expected: Vec<String> = fs::read_dir(dir.path().join("_posts"))
            .unwrap()
            .map(|e| format!("posts/{}", e.unwrap().file_name().to_string_lossy()))
            .collect();

        let result = scan(&paths, "files: [{posts: [\"*.html\"]}]").unwrap();
        let found: Vec<String> = result.files.iter().map(|f| f.name.clone()).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_hidden_and_header_only_skipped() {
        let (_dir, paths) = site(&[
            ("_posts/hidden.html", "---\nhidden: true\n---\nbody"),
            ("_posts/draft.html", "---\npublished: false\n---\nbody"),
            ("_posts/empty.html", "---\ntitle: nothing\n---\n  \n"),
            ("_posts/kept.html", "kept"),
        ]);
        let result = scan(
            &paths,
            "files: [{posts: [hidden.html, draft.html, empty.html, kept.html]}]",
        )
        .unwrap();

        assert_eq!(names(&result), ["posts/kept.html"]);
        assert_eq!(listing(&result, "posts"), ["posts/kept"]);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn test_hidden_still_counts_as_seen() {
        let (_dir, paths) = site(&[("_posts/a.html", "---\nhidden: true\n---\nbody")]);
        let result = scan(&paths, "files: [{posts: [a.html, a.html]}]").unwrap();
        assert!(result.files.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_explicit_order_in_listing() {
        let (_dir, paths) = site(&[
            ("_posts/second.html", "---\norder: 2\n---\nx"),
            ("_posts/first.html", "---\norder: 1\n---\nx"),
        ]);
        let result = scan(&paths, "files: [{posts: [second.html, first.html]}]").unwrap();

        assert_eq!(listing(&result, "posts"), ["posts/first", "posts/second"]);
        // render order stays scan order
        assert_eq!(names(&result), ["posts/second.html", "posts/first.html"]);
    }

    #[test]
    fn test_missing_file_fails() {
        let (_dir, paths) = site(&[]);
        let err = scan(&paths, "files: [missing.html]").unwrap_err();
        assert!(format!("{err:#}").contains("missing.html"));
    }

    #[test]
    fn test_missing_group_dir_fails() {
        let (_dir, paths) = site(&[]);
        assert!(scan(&paths, "files: [{posts: [\"*.md\"]}]").is_err());
    }

    #[test]
    fn test_malformed_header_fails_even_when_hidden() {
        let (_dir, paths) = site(&[("a.html", "---\nhidden: true\nbody")]);
        let err = scan(&paths, "files: [a.html]").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_unsupported_type_fails() {
        let (_dir, paths) = site(&[("notes.txt", "x")]);
        let err = scan(&paths, "files: [notes.txt]").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::UnsupportedSourceType { .. })
        ));
    }

    #[test]
    fn test_required_fields() {
        let (_dir, paths) = site(&[
            ("a.html", "---\ntitle: A\n---\nA"),
            ("b.html", "B"),
            ("c.html", "---\nhidden: true\n---\nC"),
        ]);
        let config = "required_fields: [title]\nfiles: [a.html, c.html, b.html]";
        let err = scan(&paths, config).unwrap_err();

        match err.downcast_ref::<BuildError>() {
            Some(BuildError::MissingRequiredField { name, field }) => {
                assert_eq!(name, "b.html");
                assert_eq!(field, "title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wildcard_extension() {
        assert_eq!(wildcard_extension("*.md"), Some("md"));
        assert_eq!(wildcard_extension("*.html"), Some("html"));
        assert_eq!(wildcard_extension("*."), None);
        assert_eq!(wildcard_extension("a.md"), None);
        assert_eq!(wildcard_extension("*.*"), None);
    }
}
