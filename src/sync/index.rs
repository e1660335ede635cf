//! The generated overview page of the reference folder.

use crate::{
    config::SyncConfig,
    log,
    utils::{
        frontmatter::{self, FrontMatter},
        fs::write_file,
    },
};
use anyhow::{Context, Result};
use std::fmt::Write;

/// Write `<docs>/<reference>/<index.file>` from the curated entry list.
///
/// Curated entries missing from `synced` are still listed but logged.
pub fn create_reference_index(config: &SyncConfig, synced: &[String]) -> Result<()> {
    for entry in &config.index.entries {
        if !synced.contains(&entry.file) {
            log!("warn"; "overview lists {} which was not synced", entry.file);
        }
    }

    let content = render_index(config)?;
    let path = config.reference_dir().join(&config.index.file);
    write_file(&path, &content)?;

    log!("index"; "{}", config.index.file);
    Ok(())
}

fn render_index(config: &SyncConfig) -> Result<String> {
    let index = &config.index;
    let front_matter = FrontMatter {
        id: "overview".into(),
        title: index.title.clone(),
        sidebar_label: Some("Overview".into()),
        sidebar_position: Some(1),
        description: format!("Overview of the {} specification", config.site.project),
    };

    let mut body = format!("# {}\n\n", index.title);
    if !index.intro.trim().is_empty() {
        body.push_str(index.intro.trim());
        body.push_str("\n\n");
    }
    body.push_str("## Documents\n\n");
    for entry in &index.entries {
        write!(body, "- [{}](./{})", entry.title, entry.file)?;
        if !entry.summary.trim().is_empty() {
            write!(body, ": {}", entry.summary.trim())?;
        }
        body.push('\n');
    }

    frontmatter::render(&front_matter.to_mapping(), &body)
        .context("Failed to render the overview front-matter")
}
