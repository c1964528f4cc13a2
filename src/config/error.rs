//! Errors raised while reading `_config.yml` / `_config.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid YAML in site config")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML in site config")]
    Toml(#[from] toml::de::Error),

    #[error("invalid site config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;

    fn config_error(err: &anyhow::Error) -> &ConfigError {
        err.downcast_ref::<ConfigError>()
            .unwrap_or_else(|| panic!("not a config error: {err:?}"))
    }

    #[test]
    fn test_yaml_error_keeps_parser_cause() {
        let err = SiteConfig::from_yaml("files: [index.html").unwrap_err();
        assert!(matches!(config_error(&err), ConfigError::Yaml(_)));

        let chain = format!("{err:#}");
        assert!(chain.starts_with("invalid YAML in site config: "));
    }

    #[test]
    fn test_toml_error() {
        let err = SiteConfig::from_toml("files = [").unwrap_err();
        assert!(matches!(config_error(&err), ConfigError::Toml(_)));
    }

    #[test]
    fn test_wrong_shape_is_a_parse_error() {
        let err = SiteConfig::from_yaml("files: index.html").unwrap_err();
        assert!(matches!(config_error(&err), ConfigError::Yaml(_)));

        let err = SiteConfig::from_yaml("files: []\nserve: { colour: red }").unwrap_err();
        assert!(matches!(config_error(&err), ConfigError::Yaml(_)));
    }

    #[test]
    fn test_unreadable_config_names_the_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/_config.yml")).unwrap_err();
        match config_error(&err) {
            ConfigError::Io(path, _) => assert_eq!(path, Path::new("/nonexistent/_config.yml")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(format!("{err}").contains("_config.yml"));
    }

    #[test]
    fn test_validation_message() {
        let err = SiteConfig::from_yaml("files: [\"\"]").unwrap().validate().unwrap_err();
        assert!(matches!(config_error(&err), ConfigError::Validation(_)));
        assert!(format!("{err}").starts_with("invalid site config: [files]"));
    }
}
