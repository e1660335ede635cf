//! `[site]` section configuration.
//!
//! Destination layout of the documentation tree.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// `[site]` section in specsync.toml - destination tree layout.
///
/// `reference` and `examples` are relative to `docs`.
///
/// # Example
/// ```toml
/// [site]
/// project = "OpenWorkflow"
/// docs = "docs"
/// reference = "specification"
/// examples = "examples"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Project name used in generated descriptions.
    #[serde(default = "defaults::site::project")]
    #[educe(Default = defaults::site::project())]
    pub project: String,

    /// Documentation root (relative to project root).
    #[serde(default = "defaults::site::docs")]
    #[educe(Default = defaults::site::docs())]
    pub docs: PathBuf,

    /// Reference subtree holding one file per specification document.
    #[serde(default = "defaults::site::reference")]
    #[educe(Default = defaults::site::reference())]
    pub reference: PathBuf,

    /// Examples subtree mirrored from the source.
    #[serde(default = "defaults::site::examples")]
    #[educe(Default = defaults::site::examples())]
    pub examples: PathBuf,
}

impl SiteConfig {
    /// Link prefix leading from the reference folder to the examples folder.
    ///
    /// ```ignore
    /// // reference = "specification", examples = "examples"
    /// site.examples_from_reference() // → "../examples"
    /// ```
    pub fn examples_from_reference(&self) -> String {
        relative_link(&self.reference, &self.examples)
    }

    /// Link prefix leading from the docs root to the reference folder, e.g. `./specification`.
    pub fn reference_from_docs(&self) -> String {
        relative_link(Path::new(""), &self.reference)
    }

    /// Link prefix leading from the docs root to the examples folder, e.g. `./examples`.
    pub fn examples_from_docs(&self) -> String {
        relative_link(Path::new(""), &self.examples)
    }
}

/// Relative URL-style path from directory `from` to directory `to`.
///
/// Both must be relative paths without `..` (checked by `validate`).
fn relative_link(from: &Path, to: &Path) -> String {
    let from: Vec<_> = normal_components(from);
    let to: Vec<_> = normal_components(to);

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let ups = from.len() - common;

    let mut parts: Vec<String> = Vec::with_capacity(ups + to.len() - common);
    if ups == 0 {
        parts.push(".".into());
    }
    parts.extend(std::iter::repeat_n("..".to_string(), ups));
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(reference: &str, examples: &str) -> SiteConfig {
        SiteConfig {
            reference: reference.into(),
            examples: examples.into(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_sibling_folders() {
        assert_eq!(site("specification", "examples").examples_from_reference(), "../examples");
    }

    #[test]
    fn test_nested_reference() {
        assert_eq!(site("reference/spec", "examples").examples_from_reference(), "../../examples");
    }

    #[test]
    fn test_examples_inside_reference() {
        assert_eq!(site("spec", "spec/examples").examples_from_reference(), "./examples");
    }

    #[test]
    fn test_shared_parent() {
        assert_eq!(site("ref/spec", "ref/examples").examples_from_reference(), "../examples");
    }

    #[test]
    fn test_from_docs_root() {
        let site = site("specification", "./examples");
        assert_eq!(site.reference_from_docs(), "./specification");
        assert_eq!(site.examples_from_docs(), "./examples");
    }

    #[test]
    fn test_site_defaults() {
        let site = SiteConfig::default();
        assert_eq!(site.project, "OpenWorkflow");
        assert_eq!(site.docs, PathBuf::from("docs"));
        assert_eq!(site.reference, PathBuf::from("specification"));
        assert_eq!(site.examples, PathBuf::from("examples"));
    }
}
