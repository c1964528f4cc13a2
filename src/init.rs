//! Site initialization module.
//!
//! Creates new site structure with default configuration.

use crate::config::{FileSpec, SiteConfig, SitePaths, defaults::DEFAULT_CONFIG_FILE};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{fs, path::Path};

/// Starter files written next to the config: (path relative to root, content)
const STARTER_FILES: &[(&str, &str)] = &[
    (
        "index.html",
        "---\nlayout: default\ntitle: Home\n---\n<h1>{{ page.title }}</h1>\n<p>Welcome to {{ site.title }}.</p>\n",
    ),
    (
        "_layouts/default.html",
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{{ page.title }} | {{ site.title }}</title>\n</head>\n<body>\n{{ content }}\n{% include \"footer.html\" %}\n</body>\n</html>\n",
    ),
    ("_includes/footer.html", "<footer>{{ site.title }}</footer>\n"),
];

/// Create a new site at `root`.
pub fn new_site(root: &Path) -> Result<()> {
    if let Some(existing) = SiteConfig::find(root) {
        bail!(
            "Config file `{}` already exists. Remove it manually or init in a different path.",
            existing.display()
        );
    }

    let paths = SitePaths::new(root);
    paths.ensure_dirs()?;
    init_default_config(root)?;
    init_starter_files(root)?;

    Ok(())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let mut config = SiteConfig {
        files: Some(vec![FileSpec::File("index.html".into())]),
        ..SiteConfig::default()
    };
    config
        .metadata
        .insert("title".into(), Value::from("My nanosite"));

    let content = serde_yaml::to_string(&config)?;
    let path = root.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the starter page, layout and fragment, leaving existing files alone
fn init_starter_files(root: &Path) -> Result<()> {
    for (name, content) in STARTER_FILES {
        let path = root.join(name);
        if path.exists() {
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
