//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [source] Section Defaults
// ============================================================================

pub mod source {
    use std::path::PathBuf;

    pub fn repository() -> String {
        "https://github.com/openworkflow/openworkflow-spec.git".into()
    }

    pub fn name() -> String {
        "openworkflow-spec".into()
    }

    pub fn branch() -> String {
        "main".into()
    }

    pub fn ci_checkout() -> PathBuf {
        "spec-repo".into()
    }

    pub fn local() -> PathBuf {
        "../openworkflow-spec".into()
    }

    pub fn clone_dir() -> Option<PathBuf> {
        None
    }

    pub fn web_url() -> Option<String> {
        None
    }

    pub fn spec_dir() -> String {
        "spec".into()
    }

    pub fn examples_dir() -> String {
        "examples".into()
    }
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    use std::path::PathBuf;

    pub fn project() -> String {
        "OpenWorkflow".into()
    }

    pub fn docs() -> PathBuf {
        "docs".into()
    }

    pub fn reference() -> PathBuf {
        "specification".into()
    }

    pub fn examples() -> PathBuf {
        "examples".into()
    }
}

// ============================================================================
// [index] Section Defaults
// ============================================================================

pub mod index {
    use super::super::IndexEntry;

    pub fn file() -> String {
        "index.md".into()
    }

    pub fn title() -> String {
        "Specification Overview".into()
    }

    pub fn intro() -> String {
        "The OpenWorkflow specification defines how workflows, connectors and actions \
         are described and executed. Each document below is synced from the \
         specification repository."
            .into()
    }

    pub fn entries() -> Vec<IndexEntry> {
        [
            ("workflow.md", "Workflow Definition", "Structure of a workflow document and its steps."),
            ("connector.md", "Connector Specification", "How connectors declare and expose actions."),
            ("action.md", "Action Schema", "Inputs, outputs and metadata of a single action."),
            ("execution.md", "Execution Model", "Step scheduling, data flow and lifecycle of a run."),
            ("errors.md", "Error Handling", "Error categories, retries and failure propagation."),
        ]
        .into_iter()
        .map(|(file, title, summary)| IndexEntry {
            file: file.into(),
            title: title.into(),
            summary: summary.into(),
        })
        .collect()
    }
}
