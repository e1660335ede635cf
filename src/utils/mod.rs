//! Utility modules shared by the sync steps.

pub mod exec;
pub mod frontmatter;
pub mod fs;
pub mod git;
pub mod markdown;
