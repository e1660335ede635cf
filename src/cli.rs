//! Command-line interface definitions.
//!
//! Every argument is optional: a bare `specsync` run resolves the source on its own
//! and writes into the docs tree described by `specsync.toml` (or the defaults).

use clap::Parser;
use std::path::PathBuf;

/// Sync the OpenWorkflow specification into the documentation site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the project root
    #[arg(short = 'C', long, default_value = "specsync.toml")]
    pub config: PathBuf,

    /// Use this directory as the specification source instead of resolving one.
    ///
    /// Skips the CI checkout, the sibling checkout and the cached clone entirely.
    #[arg(short, long)]
    pub source: Option<PathBuf>,
}
