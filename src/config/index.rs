//! `[index]` section configuration.
//!
//! The curated list of specification documents shown on the overview page.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[index]` section in specsync.toml.
///
/// # Example
/// ```toml
/// [index]
/// title = "Specification Overview"
///
/// [[index.entries]]
/// file = "workflow.md"
/// title = "Workflow Definition"
/// summary = "Structure of a workflow document."
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// File name of the overview inside the reference folder.
    #[serde(default = "defaults::index::file")]
    #[educe(Default = defaults::index::file())]
    pub file: String,

    /// Overview page title.
    #[serde(default = "defaults::index::title")]
    #[educe(Default = defaults::index::title())]
    pub title: String,

    /// Paragraph shown above the document list.
    #[serde(default = "defaults::index::intro")]
    #[educe(Default = defaults::index::intro())]
    pub intro: String,

    /// Curated documents, in sidebar order.
    #[serde(default = "defaults::index::entries")]
    #[educe(Default = defaults::index::entries())]
    pub entries: Vec<IndexEntry>,
}

/// One curated document on the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    /// File name inside the specification folder, e.g. `workflow.md`.
    pub file: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

impl IndexConfig {
    /// Sidebar position of a curated document; the overview itself takes position 1.
    pub fn sidebar_position(&self, file: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.file == file)
            .map(|i| i + 2)
    }
}
