//! Root documents of the source repository, written to the docs root under
//! fixed names and identities.

use super::SyncError;
use crate::{
    config::SyncConfig,
    log,
    utils::{
        frontmatter::{self, Document, FrontMatter},
        fs::write_file,
        markdown::{self, RootLinks},
    },
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// A root document and its fixed destination identity.
#[derive(Debug, Clone, Copy)]
pub struct RootDocument {
    pub source: &'static str,
    pub dest: &'static str,
    pub id: &'static str,
    pub title: &'static str,
    pub sidebar_position: usize,
    /// Description template; `{project}` is replaced by the project name
    pub description: &'static str,
}

pub const ROOT_DOCUMENTS: &[RootDocument] = &[
    RootDocument {
        source: "README.md",
        dest: "intro.md",
        id: "intro",
        title: "Introduction",
        sidebar_position: 1,
        description: "Introduction to the {project} specification",
    },
    RootDocument {
        source: "CONTRIBUTING.md",
        dest: "contributing.md",
        id: "contributing",
        title: "Contributing",
        sidebar_position: 90,
        description: "How to contribute to the {project} specification",
    },
    RootDocument {
        source: "CHANGELOG.md",
        dest: "changelog.md",
        id: "changelog",
        title: "Changelog",
        sidebar_position: 91,
        description: "Release history of the {project} specification",
    },
];

const CONTRIBUTING: &str = "CONTRIBUTING.md";
const LICENSE: &str = "LICENSE";

impl RootDocument {
    fn front_matter(&self, project: &str) -> FrontMatter {
        FrontMatter {
            id: self.id.into(),
            title: self.title.into(),
            sidebar_label: Some(self.title.into()),
            sidebar_position: Some(self.sidebar_position),
            description: self.description.replace("{project}", project),
        }
    }
}

/// Sync README, CONTRIBUTING and CHANGELOG; absent files are skipped.
///
/// Returns the destination names written, in table order.
pub fn sync_root_documents(source: &Path, config: &SyncConfig) -> Result<Vec<&'static str>> {
    let links = root_links(source, config);
    let mut written = Vec::new();

    for doc in ROOT_DOCUMENTS {
        let path = source.join(doc.source);
        if !path.is_file() {
            log!("root"; "{} not found, skipping", doc.source);
            continue;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let output = transform_root(doc, &content, &config.site.project, &links)?;
        write_file(&config.docs_dir().join(doc.dest), &output)?;

        log!("root"; "{} -> {}", doc.source, doc.dest);
        written.push(doc.dest);
    }

    Ok(written)
}

/// Link rules for the docs root.
///
/// CONTRIBUTING points at the local page when the source carries it, at the
/// repository otherwise; LICENSE always points at the repository.
fn root_links<'a>(source: &Path, config: &'a SyncConfig) -> RootLinks<'a> {
    let contributing = if source.join(CONTRIBUTING).is_file() {
        "./contributing".to_owned()
    } else {
        config.source.blob_url(CONTRIBUTING)
    };

    RootLinks {
        spec_dir: &config.source.spec_dir,
        examples_dir: &config.source.examples_dir,
        reference_prefix: config.site.reference_from_docs(),
        examples_prefix: config.site.examples_from_docs(),
        reference_index: &config.index.file,
        cross_refs: vec![
            (CONTRIBUTING.to_owned(), contributing),
            (LICENSE.to_owned(), config.source.blob_url(LICENSE)),
        ],
    }
}

/// Replace the front-matter of a root document and rewrite its links.
fn transform_root(
    doc: &RootDocument,
    content: &str,
    project: &str,
    links: &RootLinks,
) -> Result<String> {
    let parsed = Document::parse(content).map_err(|source| SyncError::FrontMatter {
        file: doc.source.to_owned(),
        source,
    })?;

    let body = markdown::transform(&parsed.body, links, false);
    frontmatter::render(&doc.front_matter(project).to_mapping(), &body)
        .with_context(|| format!("Failed to render front-matter for {}", doc.dest))
}
