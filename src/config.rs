//! Configuration loading and parsing for `frontkit.toml` files.
//!
//! The configuration is built once by the CLI and handed to the components
//! that need it. Environment variables override values from the file.
use log::*;
use secrecy::SecretString;
use serde::Deserialize;
use std::{env, fs, path::Path};

use crate::error::{FrontkitError, Result};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "frontkit.toml";
/// Default number of spaces used when rewriting manifest files.
pub const DEFAULT_INDENT: usize = 4;
/// Default number of commits to scan when resolving version bumps. 0 scans
/// the full history.
pub const DEFAULT_COMMIT_SEARCH_DEPTH: u64 = 0;
/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default author name used for version bump commits.
pub const DEFAULT_AUTOMATION_NAME: &str = "github-actions[bot]";
/// Default author email used for version bump commits. Commits authored by
/// this address mark the end of unprocessed history.
pub const DEFAULT_AUTOMATION_EMAIL: &str =
    "41898282+github-actions[bot]@users.noreply.github.com";
/// Environment variable holding the GitHub access token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
/// Environment variable overriding the manifest indentation width.
pub const INDENT_ENV_VAR: &str = "FRONTKIT_INDENT";

/// GitHub connection and automation identity settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)] // Use default for missing fields
pub struct GithubConfig {
    /// Author name for commits created by frontkit.
    pub automation_name: String,
    /// Author email for commits created by frontkit.
    pub automation_email: String,
    /// Base URL of the GitHub REST API (GitHub Enterprise supported).
    pub api_url: String,
    /// Maximum number of commits / pull requests fetched. 0 means no limit.
    pub commit_search_depth: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            automation_name: DEFAULT_AUTOMATION_NAME.into(),
            automation_email: DEFAULT_AUTOMATION_EMAIL.into(),
            api_url: DEFAULT_API_URL.into(),
            commit_search_depth: DEFAULT_COMMIT_SEARCH_DEPTH,
        }
    }
}

/// Version-bearing manifest settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Indentation width used when rewriting manifests.
    pub indent: usize,
    /// Manifest paths relative to the repository root. The first entry is
    /// the primary manifest and must exist; the rest are updated when
    /// present.
    pub paths: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            paths: vec!["package.json".into(), "package-lock.json".into()],
        }
    }
}

/// Root configuration structure for `frontkit.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub settings.
    pub github: GithubConfig,
    /// Manifest settings.
    pub manifest: ManifestConfig,
    /// Access token, only ever read from the environment.
    #[serde(skip)]
    pub token: Option<SecretString>,
}

impl Config {
    /// Load configuration from `path` when it exists, falling back to
    /// defaults, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            debug!("loading configuration from {}", path.display());
            let content = fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            info!("no configuration found: using default");
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `GITHUB_TOKEN` and `FRONTKIT_INDENT` overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(token) = env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            self.token = Some(SecretString::from(token));
        }

        if let Ok(indent) = env::var(INDENT_ENV_VAR) {
            self.manifest.indent = indent.trim().parse().map_err(|_| {
                FrontkitError::invalid_config(format!(
                    "{INDENT_ENV_VAR} must be a number of spaces, got: {indent}"
                ))
            })?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.manifest.paths.is_empty() {
            return Err(FrontkitError::invalid_config(
                "manifest.paths must name at least one manifest",
            ));
        }

        if self.github.automation_email.is_empty() {
            return Err(FrontkitError::invalid_config(
                "github.automation_email must not be empty",
            ));
        }

        Ok(())
    }

    /// Effective search depth where 0 means unlimited.
    pub fn search_depth(&self) -> u64 {
        if self.github.commit_search_depth == 0 {
            return u64::MAX;
        }
        self.github.commit_search_depth
    }

    /// Path of the manifest the current version is read from.
    pub fn primary_manifest(&self) -> Result<&str> {
        self.manifest.paths.first().map(String::as_str).ok_or_else(|| {
            FrontkitError::invalid_config("no manifest paths configured")
        })
    }
}
