//! Configuration management for Mosaic.
//!
//! Parses `mosaic.toml` with serde. Every field has a default, so an
//! empty file (or no file at all) yields a working local configuration.
//!
//! ```toml
//! [site]
//! base_url = "https://example.com"
//! uploads_prefix = "/uploads"
//!
//! [collections]
//! per_page = 12
//! max_per_page = 48
//! ```

use std::path::Path;

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "mosaic.toml";

/// Configuration load failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid TOML or has mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,
    /// Collection listing settings.
    pub collections: CollectionsConfig,
}

/// Site-wide settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL, no trailing slash.
    pub base_url: String,
    /// URL prefix for uploaded media.
    pub uploads_prefix: String,
    /// Fallback hero background image.
    pub hero_fallback: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            uploads_prefix: "/uploads".to_owned(),
            hero_fallback: "/assets/hero-default.jpg".to_owned(),
        }
    }
}

/// Collection listing settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Default page size.
    pub per_page: u32,
    /// Upper bound on the client-requested page size.
    ///
    /// Narrows within the server-wide maximum of 48; values above it
    /// have no effect.
    pub max_per_page: u32,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            per_page: 12,
            max_per_page: 48,
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config.site.base_url, "");
        assert_eq!(config.site.uploads_prefix, "/uploads");
        assert_eq!(config.collections.per_page, 12);
        assert_eq!(config.collections.max_per_page, 48);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = Config::from_toml_str(
            r#"
            [site]
            base_url = "https://example.com"

            [collections]
            per_page = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.uploads_prefix, "/uploads");
        assert_eq!(config.collections.per_page, 24);
        assert_eq!(config.collections.max_per_page, 48);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[site]\nbase_url = 42"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site]\nbase_url = \"https://example.com\"").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.base_url, "https://example.com");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
