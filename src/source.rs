//! Specification source resolution.
//!
//! # Candidates
//!
//! ```text
//! --source <DIR> ──► used as-is
//!        │ (absent)
//!        ▼
//! [source.ci_checkout] ──► contains spec_dir?      ──► CI checkout
//!        │                 contains <name>/?       ──► nested CI checkout
//!        ▼ (missing)
//! [source.local]       ──► sibling checkout
//!        │ (missing)
//!        ▼
//! [source.clone_dir]   ──► same origin?            ──► git pull --ff-only
//!                          otherwise               ──► git clone --depth 1
//! ```
//!
//! The first existing candidate wins; only the clone can fail the run.

use crate::{config::SyncConfig, log, sync::SyncError, utils::git};
use anyhow::{Context, Result, bail};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Which candidate the source was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// `--source` on the command line
    Explicit,
    /// Checkout provided by automation
    Ci,
    /// Repository nested inside the automation checkout
    CiNested,
    /// Sibling checkout for local development
    Local,
    /// Existing cache clone, updated in place
    Updated,
    /// Fresh clone into the cache directory
    Cloned,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "command line",
            Self::Ci => "ci checkout",
            Self::CiNested => "nested ci checkout",
            Self::Local => "local checkout",
            Self::Updated => "cached clone",
            Self::Cloned => "fresh clone",
        })
    }
}

/// The source directory selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub origin: SourceOrigin,
}

impl ResolvedSource {
    fn new(path: impl Into<PathBuf>, origin: SourceOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }
}

/// Resolve the specification source directory.
pub fn resolve_source(config: &SyncConfig) -> Result<ResolvedSource> {
    if let Some(path) = &config.source_override {
        if !path.is_dir() {
            bail!(SyncError::SourceUnavailable(format!(
                "`{}` is not a directory",
                path.display()
            )));
        }
        return Ok(ResolvedSource::new(path, SourceOrigin::Explicit));
    }

    if let Some(resolved) = resolve_ci(config) {
        return Ok(resolved);
    }

    let local = &config.source.local;
    if local.is_dir() {
        return Ok(ResolvedSource::new(local, SourceOrigin::Local));
    }

    clone_or_update(config)
        .with_context(|| SyncError::SourceUnavailable(config.source.repository.clone()))
}

/// The automation checkout, descending into a nested repository copy when the
/// specification folder is not at its top level.
fn resolve_ci(config: &SyncConfig) -> Option<ResolvedSource> {
    let ci = &config.source.ci_checkout;
    if !ci.is_dir() {
        return None;
    }

    let nested = ci.join(&config.source.name);
    if !ci.join(&config.source.spec_dir).is_dir() && nested.is_dir() {
        return Some(ResolvedSource::new(nested, SourceOrigin::CiNested));
    }

    Some(ResolvedSource::new(ci, SourceOrigin::Ci))
}

/// Update the cache clone in place, or clone afresh.
fn clone_or_update(config: &SyncConfig) -> Result<ResolvedSource> {
    let dir = config.clone_dir();
    let source = &config.source;
    git::ensure_installed()?;

    if git::is_checkout(&dir) && git::origin_matches(&dir, &source.repository)? {
        git::pull(&dir)?;
        return Ok(ResolvedSource::new(dir, SourceOrigin::Updated));
    }

    if dir.exists() {
        log!("warn"; "{} is not a clone of {}, replacing it", dir.display(), source.repository);
        remove_path(&dir)?;
    }
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    git::clone(&source.repository, &source.branch, &dir)?;
    Ok(ResolvedSource::new(dir, SourceOrigin::Cloned))
}

fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.with_context(|| format!("Failed to remove {}", path.display()))
}
