//! Sync configuration management for `specsync.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[source]`  | Specification repository and candidate checkouts    |
//! | `[site]`    | Destination docs tree layout                        |
//! | `[index]`   | Curated document list for the overview page         |
//!
//! The file is optional; every field has a default.
//!
//! # Example
//!
//! ```toml
//! [source]
//! repository = "https://github.com/openworkflow/openworkflow-spec.git"
//! local = "../openworkflow-spec"
//!
//! [site]
//! docs = "docs"
//! reference = "specification"
//!
//! [[index.entries]]
//! file = "workflow.md"
//! title = "Workflow Definition"
//! ```

pub mod defaults;
mod error;
mod index;
mod site;
mod source;

pub use error::ConfigError;
pub use index::{IndexConfig, IndexEntry};
pub use site::SiteConfig;
pub use source::SourceConfig;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing specsync.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Source directory forced from the command line
    #[serde(skip)]
    pub source_override: Option<PathBuf>,

    /// Specification repository settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Destination layout
    #[serde(default)]
    pub site: SiteConfig,

    /// Overview page
    #[serde(default)]
    pub index: IndexConfig,
}

impl SyncConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.source_override = cli
            .source
            .as_ref()
            .map(|source| Self::normalize_path(&Self::expand_tilde(source)));
        self.update_path_with_root(&root);
    }

    /// Anchor all relative paths at `root`.
    #[cfg(test)]
    pub fn with_root(mut self, root: &Path) -> Self {
        self.update_path_with_root(root);
        self
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);

        self.source.ci_checkout = Self::normalize_path(&root.join(&self.source.ci_checkout));

        let local = Self::expand_tilde(&self.source.local);
        self.source.local = Self::normalize_path(&root.join(local));

        let clone_dir = match &self.source.clone_dir {
            Some(dir) => root.join(Self::expand_tilde(dir)),
            None => std::env::temp_dir().join(&self.source.name),
        };
        self.source.clone_dir = Some(Self::normalize_path(&clone_dir));

        self.site.docs = Self::normalize_path(&root.join(&self.site.docs));
        self.root = root;
    }

    /// Expand a leading `~` in a path
    fn expand_tilde(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    // ========================================================================
    // Destination paths
    // ========================================================================

    /// Documentation root directory
    pub fn docs_dir(&self) -> &Path {
        &self.site.docs
    }

    /// Reference subtree (`<docs>/<reference>`)
    pub fn reference_dir(&self) -> PathBuf {
        self.site.docs.join(&self.site.reference)
    }

    /// Examples subtree (`<docs>/<examples>`)
    pub fn examples_dest_dir(&self) -> PathBuf {
        self.site.docs.join(&self.site.examples)
    }

    /// Cache directory for the fallback clone
    pub fn clone_dir(&self) -> PathBuf {
        self.source
            .clone_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(&self.source.name))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration before syncing
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("[source.repository]", &self.source.repository),
            ("[source.name]", &self.source.name),
            ("[source.branch]", &self.source.branch),
            ("[source.spec_dir]", &self.source.spec_dir),
            ("[source.examples_dir]", &self.source.examples_dir),
            ("[index.file]", &self.index.file),
        ] {
            if value.trim().is_empty() {
                bail!(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }

        for (field, path) in [
            ("[site.reference]", &self.site.reference),
            ("[site.examples]", &self.site.examples),
        ] {
            Self::check_nested_dir(field, path)?;
        }

        if Self::strip_cur_dir(&self.site.reference) == Self::strip_cur_dir(&self.site.examples) {
            bail!(ConfigError::Validation(
                "[site.reference] and [site.examples] must be different folders".into()
            ));
        }

        if !self.index.file.ends_with(".md") {
            bail!(ConfigError::Validation("[index.file] must end with .md".into()));
        }

        if self.index.entries.is_empty() {
            bail!(ConfigError::Validation(
                "[index.entries] must list at least one document".into()
            ));
        }

        if let Some(entry) = self.index.entries.iter().find(|e| e.file.contains('/')) {
            bail!(ConfigError::Validation(format!(
                "[index.entries] `{}` must be a file name, not a path",
                entry.file
            )));
        }

        Ok(())
    }

    /// A destination folder must be a non-empty relative path that stays inside `docs`
    fn check_nested_dir(field: &str, path: &Path) -> Result<()> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            bail!(ConfigError::Validation(format!(
                "{field} must be a relative path inside [site.docs]"
            )));
        }
        if Self::strip_cur_dir(path).as_os_str().is_empty() {
            bail!(ConfigError::Validation(format!("{field} must not be empty")));
        }
        Ok(())
    }

    fn strip_cur_dir(path: &Path) -> PathBuf {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
