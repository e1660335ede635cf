//! `[source]` section configuration.
//!
//! Describes where the specification repository lives and how its content is laid out.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[source]` section in specsync.toml - specification repository settings.
///
/// Candidate checkouts are tried in order: `ci_checkout`, `local`, then a clone
/// of `repository` into `clone_dir`.
///
/// # Example
/// ```toml
/// [source]
/// repository = "https://github.com/openworkflow/openworkflow-spec.git"
/// branch = "main"
/// ci_checkout = "spec-repo"
/// local = "~/code/openworkflow-spec"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Git URL of the specification repository.
    #[serde(default = "defaults::source::repository")]
    #[educe(Default = defaults::source::repository())]
    pub repository: String,

    /// Repository directory name, used for the nested CI checkout and the cache clone.
    #[serde(default = "defaults::source::name")]
    #[educe(Default = defaults::source::name())]
    pub name: String,

    /// Branch to clone.
    #[serde(default = "defaults::source::branch")]
    #[educe(Default = defaults::source::branch())]
    pub branch: String,

    /// Checkout location provided by automation (relative to project root).
    #[serde(default = "defaults::source::ci_checkout")]
    #[educe(Default = defaults::source::ci_checkout())]
    pub ci_checkout: PathBuf,

    /// Sibling checkout for interactive development. `~` is expanded.
    #[serde(default = "defaults::source::local")]
    #[educe(Default = defaults::source::local())]
    pub local: PathBuf,

    /// Where to clone when no checkout exists (default: `<temp>/<name>`).
    #[serde(default = "defaults::source::clone_dir")]
    #[educe(Default = defaults::source::clone_dir())]
    pub clone_dir: Option<PathBuf>,

    /// Browsable URL used for external fallback links (default: `repository` without `.git`).
    #[serde(default = "defaults::source::web_url")]
    #[educe(Default = defaults::source::web_url())]
    pub web_url: Option<String>,

    /// Specification folder inside the source tree.
    #[serde(default = "defaults::source::spec_dir")]
    #[educe(Default = defaults::source::spec_dir())]
    pub spec_dir: String,

    /// Examples folder inside the source tree.
    #[serde(default = "defaults::source::examples_dir")]
    #[educe(Default = defaults::source::examples_dir())]
    pub examples_dir: String,
}

impl SourceConfig {
    /// Web URL of the repository, e.g. for `blob/<branch>/LICENSE` links.
    pub fn web_url(&self) -> String {
        match &self.web_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => self
                .repository
                .trim_end_matches('/')
                .trim_end_matches(".git")
                .to_owned(),
        }
    }

    /// URL of a file in the repository at the configured branch.
    pub fn blob_url(&self, file: &str) -> String {
        format!("{}/blob/{}/{file}", self.web_url(), self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SyncConfig;
    use std::path::PathBuf;

    #[test]
    fn test_source_config_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();

        assert_eq!(config.source.name, "openworkflow-spec");
        assert_eq!(config.source.branch, "main");
        assert_eq!(config.source.ci_checkout, PathBuf::from("spec-repo"));
        assert_eq!(config.source.spec_dir, "spec");
        assert_eq!(config.source.examples_dir, "examples");
        assert!(config.source.clone_dir.is_none());
    }

    #[test]
    fn test_web_url_derived_from_repository() {
        let config: SyncConfig = toml::from_str(
            r#"
            [source]
            repository = "https://github.com/acme/spec.git"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.web_url(), "https://github.com/acme/spec");
        assert_eq!(
            config.source.blob_url("LICENSE"),
            "https://github.com/acme/spec/blob/main/LICENSE"
        );
    }

    #[test]
    fn test_web_url_override() {
        let config: SyncConfig = toml::from_str(
            r#"
            [source]
            web_url = "https://git.example.com/spec/"
            branch = "develop"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source.blob_url("LICENSE"),
            "https://git.example.com/spec/blob/develop/LICENSE"
        );
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SyncConfig, _> = toml::from_str(
            r#"
            [source]
            mirror = "nope"
            "#,
        );
        assert!(result.is_err());
    }
}
