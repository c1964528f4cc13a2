//! Template registry and the two-pass page renderer.
//!
//! # Registry
//!
//! | Directory     | Registered as         | Used from templates            |
//! |---------------|-----------------------|--------------------------------|
//! | `_includes/`  | `nav.html`            | `{% include "nav.html" %}`     |
//! | `_layouts/`   | `layouts/base.html`   | `layout: base` in a header     |
//!
//! Each fragment is also bound in the render context by stem (`nav`) to its
//! source text.
//!
//! # Render passes
//!
//! ```text
//! body ──► pass A: render with { site, page, fragments } ──► html
//!                                                             │
//!          header.layout? ── no ──────────────────────────────┴──► output
//!                │
//!               yes ──► pass B: render layout with { ..., content: html } ──► output
//! ```

use super::meta::SourceFile;
use crate::config::SitePaths;
use crate::error::BuildError;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{collections::BTreeMap, fs, path::Path};
use tera::{Context as TeraContext, Tera};
use walkdir::WalkDir;

/// Prefix under which layouts are registered in the engine
const LAYOUT_PREFIX: &str = "layouts/";

/// Files to ignore when loading template directories
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// A named template loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// File name inside its directory, e.g. `nav.html`
    pub file_name: String,
    /// Template text
    pub source: String,
}

/// Fragments and layouts of one site, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    pub fragments: BTreeMap<String, Template>,
    pub layouts: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Load `_includes` and `_layouts`.
    pub fn load(paths: &SitePaths) -> Result<Self> {
        Ok(Self {
            fragments: load_dir(&paths.includes)?,
            layouts: load_dir(&paths.layouts)?,
        })
    }
}

/// Read every top-level file of a template directory, keyed by stem.
///
/// Two files sharing a stem (`nav.html`, `nav.txt`) are rejected.
fn load_dir(dir: &Path) -> Result<BTreeMap<String, Template>> {
    let mut templates: BTreeMap<String, Template> = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !path.is_file() || IGNORED_FILES.contains(&file_name.as_str()) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(previous) = templates.get(&stem) {
            bail!(BuildError::DuplicateTemplate {
                dir: dir.to_path_buf(),
                first: previous.file_name.clone(),
                second: file_name,
            });
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        templates.insert(stem, Template { file_name, source });
    }

    Ok(templates)
}

/// Renders page bodies and wraps them in layouts.
pub struct TemplateEngine {
    tera: Tera,
    /// Fragment stem → source, bound into every render context
    fragments: Vec<(String, String)>,
    /// Layout stem → registered template name
    layouts: BTreeMap<String, String>,
}

impl TemplateEngine {
    pub fn new(registry: &TemplateRegistry) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut raw = Vec::with_capacity(registry.fragments.len() + registry.layouts.len());
        let mut layouts = BTreeMap::new();
        for template in registry.fragments.values() {
            raw.push((template.file_name.clone(), template.source.clone()));
        }
        for (stem, template) in &registry.layouts {
            let name = format!("{LAYOUT_PREFIX}{}", template.file_name);
            raw.push((name.clone(), template.source.clone()));
            layouts.insert(stem.clone(), name);
        }
        tera.add_raw_templates(raw)
            .context("Failed to parse templates in _includes/_layouts")?;

        let fragments = registry
            .fragments
            .iter()
            .map(|(stem, t)| (stem.clone(), t.source.clone()))
            .collect();

        Ok(Self {
            tera,
            fragments,
            layouts,
        })
    }

    /// Fail if any page names a layout that is not registered.
    pub fn check_layouts<'f>(&self, files: impl IntoIterator<Item = &'f SourceFile>) -> Result<()> {
        for file in files {
            self.layout_for(file)?;
        }
        Ok(())
    }

    fn layout_for(&self, file: &SourceFile) -> Result<Option<&str>> {
        let Some(layout) = &file.header.layout else {
            return Ok(None);
        };
        match self.layouts.get(layout) {
            Some(name) => Ok(Some(name.as_str())),
            None => bail!(BuildError::MissingLayout {
                name: file.name.clone(),
                layout: layout.clone(),
            }),
        }
    }

    /// Render one page.
    ///
    /// Returns `None` for header-only documents, which produce no output.
    pub fn render(&mut self, file: &SourceFile, site: &Value) -> Result<Option<String>> {
        if !file.has_body() {
            return Ok(None);
        }
        let layout = self.layout_for(file)?.map(str::to_owned);

        let mut context = TeraContext::new();
        for (stem, source) in &self.fragments {
            context.insert(stem.as_str(), source);
        }
        context.insert("site", site);
        context.insert("page", &file.page());

        let body = self
            .tera
            .render_str(&file.body, &context)
            .map_err(|cause| template_error(&file.name, cause))?;

        let Some(layout) = layout else {
            return Ok(Some(body));
        };

        context.insert("content", &body);
        let output = self
            .tera
            .render(&layout, &context)
            .map_err(|cause| template_error(&file.name, cause))?;
        Ok(Some(output))
    }
}

fn template_error(name: &str, cause: tera::Error) -> BuildError {
    BuildError::Template {
        name: name.to_owned(),
        cause,
    }
}
