//! Specification documents: `<source>/<spec_dir>/*.md` → `<docs>/<reference>/`.

use super::SyncError;
use crate::{
    config::SyncConfig,
    log,
    utils::{
        frontmatter::{self, Document, FrontMatter},
        fs::{markdown_files, write_file},
        markdown::{self, SpecLinks},
    },
};
use anyhow::{Context, Result, bail};
use std::{collections::HashSet, fs, path::Path};

/// Sync every top-level specification document.
///
/// Returns the synced file names in sorted order.
///
/// # Errors
/// Fails without touching the destination when the specification folder is
/// missing, and aborts on the first document with malformed front-matter.
pub fn sync_specifications(source: &Path, config: &SyncConfig) -> Result<Vec<String>> {
    let spec_dir = source.join(&config.source.spec_dir);
    if !spec_dir.is_dir() {
        bail!(SyncError::MissingSpecDir(spec_dir));
    }

    let files = markdown_files(&spec_dir)?;
    let dest_dir = config.reference_dir();
    let links = SpecLinks {
        spec_dir: &config.source.spec_dir,
        examples_dir: &config.source.examples_dir,
        examples_prefix: config.site.examples_from_reference(),
    };

    let mut synced = Vec::with_capacity(files.len());
    for path in files {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log!("warn"; "skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if file_name == config.index.file {
            log!("warn"; "{file_name} collides with the generated overview, skipping");
            continue;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let output = transform_spec(file_name, &content, config, &links)?;
        write_file(&dest_dir.join(file_name), &output)?;

        log!("spec"; "{file_name}");
        synced.push(file_name.to_owned());
    }

    prune_stale(&dest_dir, &synced, &config.index.file)?;
    Ok(synced)
}

/// Merge front-matter and rewrite the body of one specification document.
fn transform_spec(
    file_name: &str,
    content: &str,
    config: &SyncConfig,
    links: &SpecLinks,
) -> Result<String> {
    let doc = Document::parse(content).map_err(|source| SyncError::FrontMatter {
        file: file_name.to_owned(),
        source,
    })?;

    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    let title = doc
        .explicit_str("title")
        .map_or_else(|| frontmatter::title_from_stem(stem), str::to_owned);
    let derived = FrontMatter {
        id: stem.to_owned(),
        description: format!("{} specification: {title}", config.site.project),
        sidebar_label: Some(title.clone()),
        sidebar_position: config.index.sidebar_position(file_name),
        title,
    };

    let merged = frontmatter::merge(&doc.front_matter, &derived);
    let body = markdown::transform(&doc.body, links, true);
    frontmatter::render(&merged, &body)
        .with_context(|| format!("Failed to render front-matter for {file_name}"))
}

/// Remove reference documents whose source no longer exists.
fn prune_stale(dest_dir: &Path, synced: &[String], overview: &str) -> Result<()> {
    if !dest_dir.is_dir() {
        return Ok(());
    }

    let keep: HashSet<&str> = synced
        .iter()
        .map(String::as_str)
        .chain([overview])
        .collect();

    for path in markdown_files(dest_dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !keep.contains(name) {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            log!("spec"; "removed stale {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use tempfile::TempDir;

    fn links() -> SpecLinks<'static> {
        SpecLinks {
            spec_dir: "spec",
            examples_dir: "examples",
            examples_prefix: "../examples".into(),
        }
    }

    fn parse(output: &str) -> Document {
        Document::parse(output).unwrap()
    }

    #[test]
    fn test_transform_derives_front_matter() {
        let config = SyncConfig::default();
        let output = transform_spec("event-model.md", "# Events\n", &config, &links()).unwrap();
        let doc = parse(&output);

        assert_eq!(doc.explicit_str("id"), Some("event-model"));
        assert_eq!(doc.explicit_str("title"), Some("Event Model"));
        assert_eq!(doc.explicit_str("sidebar_label"), Some("Event Model"));
        assert_eq!(
            doc.explicit_str("description"),
            Some("OpenWorkflow specification: Event Model")
        );
        assert!(!doc.front_matter.contains_key("sidebar_position"));
    }

    #[test]
    fn test_transform_curated_position() {
        let config = SyncConfig::default();
        let output = transform_spec("connector.md", "Body", &config, &links()).unwrap();
        let doc = parse(&output);

        assert_eq!(
            doc.front_matter.get("sidebar_position").and_then(Value::as_u64),
            Some(3)
        );
    }

    #[test]
    fn test_transform_explicit_title_drives_label() {
        let config = SyncConfig::default();
        let input = "---\ntitle: Workflow Definition\n---\nBody";
        let doc = parse(&transform_spec("workflow.md", input, &config, &links()).unwrap());

        assert_eq!(doc.explicit_str("sidebar_label"), Some("Workflow Definition"));
        assert_eq!(
            doc.explicit_str("description"),
            Some("OpenWorkflow specification: Workflow Definition")
        );
    }

    #[test]
    fn test_transform_rewrites_body() {
        let config = SyncConfig::default();
        let input = "See [errors](../spec/errors.md) and [demo](examples/demo/flow.json).\n";
        let output = transform_spec("action.md", input, &config, &links()).unwrap();

        assert!(output.contains("[errors](./errors.md)"));
        assert!(output.contains("[demo](../examples/demo/flow.json)"));
    }

    #[test]
    fn test_transform_reports_file_on_bad_yaml() {
        let config = SyncConfig::default();
        let input = "---\ntitle: [oops\n---\n";
        let err = transform_spec("bad.md", input, &config, &links()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::FrontMatter { file, .. }) if file == "bad.md"
        ));
    }

    #[test]
    fn test_missing_spec_dir_writes_nothing() {
        let root = TempDir::new().unwrap();
        let config = SyncConfig::default().with_root(root.path());

        assert!(sync_specifications(root.path(), &config).is_err());
        assert!(!config.reference_dir().exists());
    }

    #[test]
    fn test_overview_name_is_skipped() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("src");
        fs::create_dir_all(source.join("spec")).unwrap();
        fs::write(source.join("spec/index.md"), "# Not the overview").unwrap();
        fs::write(source.join("spec/workflow.md"), "# Workflow").unwrap();
        let config = SyncConfig::default().with_root(root.path());

        let synced = sync_specifications(&source, &config).unwrap();

        assert_eq!(synced, ["workflow.md"]);
        assert!(!config.reference_dir().join("index.md").exists());
    }

    #[test]
    fn test_prune_keeps_overview_and_other_files() {
        let dir = TempDir::new().unwrap();
        for name in ["index.md", "workflow.md", "gone.md", "diagram.svg"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        prune_stale(dir.path(), &["workflow.md".to_owned()], "index.md").unwrap();

        assert!(dir.path().join("index.md").exists());
        assert!(dir.path().join("workflow.md").exists());
        assert!(dir.path().join("diagram.svg").exists());
        assert!(!dir.path().join("gone.md").exists());
    }
}
