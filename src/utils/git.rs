//! Git operations for the cached specification checkout.
//!
//! Network operations (clone, pull) go through the `git` binary so that the
//! user's credential helpers apply; local inspection uses gix.

use crate::{exec, log, utils::exec::GIT_FILTER};
use anyhow::{Context, Result};
use gix::remote::Direction;
use std::path::Path;

/// Check that `git` is installed before attempting network operations
pub fn ensure_installed() -> Result<()> {
    which::which("git").context("`git` not found. Please install it first.")?;
    Ok(())
}

/// Whether `path` is the root of a git working tree
pub fn is_checkout(path: &Path) -> bool {
    path.join(".git").exists() && gix::open(path).is_ok()
}

/// Fetch URL of the `origin` remote, if any
pub fn origin_url(path: &Path) -> Result<Option<String>> {
    let repo = gix::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let url = repo.find_remote("origin").ok().and_then(|remote| {
        remote
            .url(Direction::Fetch)
            .or_else(|| remote.url(Direction::Push))
            .map(|url| url.to_bstring().to_string())
    });
    Ok(url)
}

/// Whether the checkout at `path` was cloned from `expected`
pub fn origin_matches(path: &Path, expected: &str) -> Result<bool> {
    Ok(origin_url(path)?.is_some_and(|url| same_remote(&url, expected)))
}

/// Compare remote URLs ignoring a trailing `/` or `.git`
fn same_remote(a: &str, b: &str) -> bool {
    fn canonical(url: &str) -> &str {
        url.trim_end_matches('/').trim_end_matches(".git")
    }
    canonical(a) == canonical(b)
}

/// Shallow-clone `url` at `branch` into `dest`
pub fn clone(url: &str, branch: &str, dest: &Path) -> Result<()> {
    log!("git"; "cloning {url} ({branch})");
    exec!(filter=&GIT_FILTER; ["git"]; "clone", "--depth", "1", "--branch", branch, url, dest)
        .with_context(|| format!("Failed to clone {url}"))?;
    Ok(())
}

/// Fast-forward an existing checkout
pub fn pull(checkout: &Path) -> Result<()> {
    log!("git"; "updating {}", checkout.display());
    exec!(filter=&GIT_FILTER; checkout; ["git"]; "pull", "--ff-only")
        .with_context(|| format!("Failed to update {}", checkout.display()))?;
    Ok(())
}
