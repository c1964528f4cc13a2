//! Site configuration management for `_config.yml`.
//!
//! # Keys
//!
//! | Key               | Purpose                                              |
//! |-------------------|------------------------------------------------------|
//! | `files`           | Ordered list of sources to render (required)         |
//! | `serve`           | Development server (interface, port)                 |
//! | `required_fields` | Header keys every rendered page must define          |
//! | anything else     | Site metadata, exposed to templates as `site.<key>`  |
//!
//! # Example
//!
//! ```yaml
//! title: My Blog
//! author: Alice
//! files:
//!   - index.html
//!   - about.md
//!   - posts:
//!       - "*.md"
//!       - drafts.html
//! ```
//!
//! `_config.toml` is accepted as well, with the same keys.

pub mod defaults;
mod error;
mod paths;
mod serve;

pub use error::ConfigError;
pub use paths::SitePaths;
pub use serve::ServeConfig;

use crate::error::BuildError;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// File Specifications
// ============================================================================

/// One element of the `files` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSpec {
    /// A literal root-level file name, e.g. `index.html`
    File(String),
    /// A directory group: `{ posts: ["*.md", "hello.html"] }`
    Group(BTreeMap<String, Vec<String>>),
}

impl FileSpec {
    /// Group name and entries, `None` for a literal file.
    ///
    /// Only meaningful after [`SiteConfig::validate`] has checked that every
    /// group mapping has exactly one key.
    pub fn as_group(&self) -> Option<(&str, &[String])> {
        match self {
            Self::File(_) => None,
            Self::Group(map) => map
                .iter()
                .next()
                .map(|(name, entries)| (name.as_str(), entries.as_slice())),
        }
    }
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing `_config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Sources to render, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileSpec>>,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Header keys every rendered page must define
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,

    /// User-defined metadata, exposed to templates under `site`
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SiteConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: SiteConfig = serde_yaml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path, choosing the format by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let mut config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            _ => Self::from_yaml(&content)?,
        };
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Locate the config file of a site root, if any.
    pub fn find(root: &Path) -> Option<PathBuf> {
        defaults::CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Find, parse and validate the config of a site root.
    ///
    /// Fails with [`BuildError::MissingConfig`] when the root has no config file.
    pub fn load(root: &Path) -> Result<Self> {
        let Some(path) = Self::find(root) else {
            bail!(BuildError::MissingConfig(root.to_path_buf()));
        };
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// The validated `files` list.
    pub fn files(&self) -> &[FileSpec] {
        self.files.as_deref().unwrap_or_default()
    }

    /// Check the shape of the `files` list.
    pub fn validate(&self) -> Result<()> {
        let Some(files) = &self.files else {
            bail!(BuildError::MissingRequiredField {
                name: self.config_name(),
                field: "files".into(),
            });
        };

        for spec in files {
            match spec {
                FileSpec::File(name) if name.trim().is_empty() => {
                    bail!(ConfigError::Validation("[files] contains an empty file name".into()));
                }
                FileSpec::Group(map) if map.len() != 1 => {
                    bail!(ConfigError::Validation(format!(
                        "[files] group entries must have exactly one key, found {}",
                        map.len()
                    )));
                }
                FileSpec::Group(map) => {
                    for (group, entries) in map {
                        if group.is_empty() || group.contains(['/', '\\']) {
                            bail!(ConfigError::Validation(format!(
                                "[files] invalid group name `{group}`"
                            )));
                        }
                        if entries.iter().any(|e| e.trim().is_empty()) {
                            bail!(ConfigError::Validation(format!(
                                "[files.{group}] contains an empty file name"
                            )));
                        }
                    }
                }
                FileSpec::File(_) => {}
            }
        }

        Ok(())
    }

    fn config_name(&self) -> String {
        self.config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| defaults::DEFAULT_CONFIG_FILE.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_group_specs() {
        let config = r#"
title: X
files:
  - index.html
  - posts:
      - "*.md"
      - hello.html
"#;
        let config = SiteConfig::from_yaml(config).unwrap();
        config.validate().unwrap();

        let files = config.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], FileSpec::File("index.html".into()));
        let (group, entries) = files[1].as_group().unwrap();
        assert_eq!(group, "posts");
        assert_eq!(entries, ["*.md".to_string(), "hello.html".to_string()]);
    }

    #[test]
    fn test_metadata_collects_other_keys() {
        let config = r#"
title: X
author: Alice
nav: [a, b]
files: []
"#;
        let config = SiteConfig::from_yaml(config).unwrap();

        assert_eq!(config.metadata.get("title"), Some(&Value::from("X")));
        assert_eq!(config.metadata.get("author"), Some(&Value::from("Alice")));
        assert!(config.metadata.get("nav").unwrap().is_array());
        assert!(!config.metadata.contains_key("files"));
        assert!(!config.metadata.contains_key("serve"));
    }

    #[test]
    fn test_missing_files_is_missing_required_field() {
        let config = SiteConfig::from_yaml("title: X").unwrap();
        let err = config.validate().unwrap_err();

        match err.downcast_ref::<BuildError>() {
            Some(BuildError::MissingRequiredField { field, .. }) => assert_eq!(field, "files"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_group_with_two_keys_rejected() {
        let config = r#"
files:
  - posts: [a.md]
    notes: [b.md]
"#;
        let config = SiteConfig::from_yaml(config).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_toml_config() {
        let config = r#"
title = "X"
required_fields = ["title"]
files = ["index.html", { posts = ["*.html"] }]

[serve]
port = 9000
"#;
        let config = SiteConfig::from_toml(config).unwrap();
        config.validate().unwrap();

        assert_eq!(config.files().len(), 2);
        assert_eq!(config.files()[1].as_group().unwrap().0, "posts");
        assert_eq!(config.required_fields, vec!["title".to_string()]);
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.metadata.get("title"), Some(&Value::from("X")));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(SiteConfig::from_yaml("files: [index.html").is_err());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_load_prefers_yml() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: yaml\nfiles: []").unwrap();
        fs::write(dir.path().join("_config.toml"), "title = \"toml\"\nfiles = []").unwrap();

        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.metadata.get("title"), Some(&Value::from("yaml")));
        assert_eq!(config.config_path, dir.path().join("_config.yml"));
    }
}
