//! Examples: `<source>/<examples_dir>/**` → `<docs>/<examples>/**`.

use crate::{
    config::SyncConfig,
    log,
    logger::ProgressBars,
    utils::{
        frontmatter::{self, FrontMatter},
        fs::{collect_files, copy_files, write_file},
    },
};
use anyhow::Result;
use std::path::Path;

/// File names the site generator treats as a folder index
const INDEX_NAMES: &[&str] = &["index.md", "index.mdx", "README.md"];

const INDEX_BODY: &str = "# Examples\n\nRunnable examples accompanying the specification.\n";

/// Mirror the examples tree and guarantee an index document.
///
/// A missing source folder is logged and skipped. Returns the number of
/// files copied.
pub fn sync_examples(source: &Path, config: &SyncConfig) -> Result<usize> {
    let src = source.join(&config.source.examples_dir);
    let dest = config.examples_dest_dir();

    let copied = if src.is_dir() {
        let files = collect_files(&src)?;
        let progress = ProgressBars::new_filtered(&[("examples", files.len())]);
        copy_files(&src, &dest, &files, |_| {
            if let Some(progress) = &progress {
                progress.inc_by_name("examples");
            }
        })?;
        drop(progress);
        log!("examples"; "copied {} files", files.len());
        files.len()
    } else {
        log!("warn"; "{} not found, skipping examples", src.display());
        0
    };

    ensure_index(&dest, &config.site.project)?;
    Ok(copied)
}

/// Write a minimal index when the examples folder has none.
fn ensure_index(dest: &Path, project: &str) -> Result<()> {
    if INDEX_NAMES.iter().any(|name| dest.join(name).is_file()) {
        return Ok(());
    }

    let front_matter = FrontMatter {
        id: "examples".into(),
        title: "Examples".into(),
        sidebar_label: Some("Examples".into()),
        sidebar_position: Some(3),
        description: format!("Examples for the {project} specification"),
    };
    let content = frontmatter::render(&front_matter.to_mapping(), INDEX_BODY)?;
    write_file(&dest.join("index.md"), &content)?;
    log!("examples"; "generated index.md");
    Ok(())
}
