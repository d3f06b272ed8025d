//! Extension configuration loaded from `locale-matrix.toml`.
//!
//! The file is optional; every field has a default. Two settings exist:
//! what to do with a test that has no locale declaration anywhere, and an
//! optional locale used to seed the process default when the environment is
//! silent. The loader trims whitespace and ignores blank locale values so a
//! templated `default_locale = ""` falls back cleanly.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use locale_matrix_common::normalise_tag;
use serde::Deserialize;
use thiserror::Error;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "locale-matrix.toml";

/// Errors raised while loading [`ExtensionConfig`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read {path}: {message}")]
    Read {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// I/O failure description.
        message: String,
    },
    /// The configuration is not valid TOML for this schema.
    #[error("invalid locale-matrix configuration: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
}

/// Behaviour for tests that declare no locales on themselves or their scope.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDeclarationPolicy {
    /// Report a precondition failure; the test does not run.
    #[default]
    Fail,
    /// Decline to handle the test so the host runs it once, unmodified.
    RunUnmodified,
}

/// Configuration for [`crate::LocaleExtension`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Behaviour when no declaration is found.
    pub missing_declaration: MissingDeclarationPolicy,
    /// Locale used to seed the process default when the environment does not
    /// name one.
    pub default_locale: Option<String>,
}

impl ExtensionConfig {
    /// Parse configuration from TOML source.
    ///
    /// ```
    /// use locale_matrix::{ExtensionConfig, MissingDeclarationPolicy};
    ///
    /// let config = ExtensionConfig::from_toml_str("missing_declaration = \"run-unmodified\"\n")
    ///     .expect("configuration should parse");
    /// assert_eq!(config.missing_declaration, MissingDeclarationPolicy::RunUnmodified);
    /// assert!(config.default_locale().is_none());
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|error| ConfigError::Parse {
            message: error.to_string(),
        })
    }

    /// Read and parse the configuration file at `path`.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            message: error.to_string(),
        })?;

        Self::from_toml_str(&source)
    }

    /// Load configuration using the supplied loader.
    ///
    /// The loader receives [`CONFIG_FILE_NAME`] so callers decide where the
    /// file lives; tests inject a stub instead of touching the file system.
    ///
    /// ```
    /// use locale_matrix::ExtensionConfig;
    ///
    /// let config = ExtensionConfig::load_with(|_| ExtensionConfig::default());
    /// assert_eq!(config, ExtensionConfig::default());
    /// ```
    #[must_use]
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnOnce(&str) -> Self,
    {
        loader(CONFIG_FILE_NAME)
    }

    /// Configured default locale, if present and not blank.
    #[must_use]
    pub fn default_locale(&self) -> Option<&str> {
        normalise_tag(self.default_locale.as_deref())
    }
}
