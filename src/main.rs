//! specsync - Sync the OpenWorkflow specification into a documentation site.

mod cli;
mod config;
mod logger;
mod source;
mod sync;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::SyncConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let (source, summary) = sync::sync_all(&config)?;
    log!(
        "done";
        "{} specifications, {} example files, {} root documents from {}",
        summary.specs.len(),
        summary.examples,
        summary.root_docs.len(),
        source.origin
    );
    Ok(())
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error; defaults apply.
fn load_config(cli: &Cli) -> Result<SyncConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SyncConfig::from_path(&config_path)?
    } else {
        SyncConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
