//! Sync orchestration.
//!
//! # Pipeline
//!
//! ```text
//! resolve_source()
//!     │
//!     └── sync_from(source)
//!             │
//!             ├── sync_specifications()  ──► <docs>/<reference>/*.md
//!             ├── sync_examples()        ──► <docs>/<examples>/**
//!             ├── sync_root_documents()  ──► <docs>/{intro,contributing,changelog}.md
//!             └── create_reference_index() ──► <docs>/<reference>/index.md
//! ```
//!
//! Steps run strictly in order and the first error aborts the rest. Files
//! written before the failure stay in place.

mod examples;
mod index;
mod root_docs;
mod specs;

pub use examples::sync_examples;
pub use index::create_reference_index;
pub use root_docs::sync_root_documents;
pub use specs::sync_specifications;

use crate::{
    config::SyncConfig,
    log,
    source::{ResolvedSource, resolve_source},
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal sync errors callers may want to tell apart.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Specification source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Specification folder not found: `{0}`")]
    MissingSpecDir(PathBuf),

    #[error("Invalid front-matter in `{file}`")]
    FrontMatter {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Specification file names written to the reference folder
    pub specs: Vec<String>,
    /// Files copied into the examples folder
    pub examples: usize,
    /// Destination names of the root documents written
    pub root_docs: Vec<&'static str>,
}

/// Resolve the source and run every sync step.
pub fn sync_all(config: &SyncConfig) -> Result<(ResolvedSource, SyncSummary)> {
    let source = resolve_source(config)?;
    log!("source"; "{} ({})", source.path.display(), source.origin);

    let summary = sync_from(&source.path, config)?;
    Ok((source, summary))
}

/// Run every sync step against an already resolved source directory.
pub fn sync_from(source: &Path, config: &SyncConfig) -> Result<SyncSummary> {
    let specs = sync_specifications(source, config)?;
    let examples = sync_examples(source, config)?;
    let root_docs = sync_root_documents(source, config)?;
    create_reference_index(config, &specs)?;

    Ok(SyncSummary {
        specs,
        examples,
        root_docs,
    })
}

// ============================================================================
// Tests
// ============================================================================
