//! Filesystem helpers shared by the sync steps.

use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Entries never mirrored from the source tree
const IGNORED_NAMES: &[&str] = &[".git", ".DS_Store"];

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Top-level `*.md` files of `dir`, sorted by file name
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("Failed to read an entry of {}", dir.display()))?
            .path();
        if path.is_file() && path.extension() == Some(OsStr::new("md")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// All files below `dir`, relative to it, skipping ignored names
///
/// # Errors
/// Fails on the first entry that cannot be read, so a mirror is never partial.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !IGNORED_NAMES
                .iter()
                .any(|name| entry.file_name() == OsStr::new(name))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file()
            && let Ok(relative) = entry.path().strip_prefix(dir)
        {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Copy `files` (relative to `src`) into `dest`, overwriting existing files.
///
/// `on_file` is called after each copy with the relative path.
pub fn copy_files(
    src: &Path,
    dest: &Path,
    files: &[PathBuf],
    mut on_file: impl FnMut(&Path),
) -> Result<()> {
    for relative in files {
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(src.join(relative), &target)
            .with_context(|| format!("Failed to copy {}", relative.display()))?;
        on_file(relative);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.md");
        write_file(&path, "hello").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_markdown_files_top_level_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join("schema.json"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.md"), "").unwrap();

        let names: Vec<_> = markdown_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.md", "b.md"]);
    }

    #[test]
    fn test_collect_files_reports_walk_errors() {
        let dir = TempDir::new().unwrap();
        let err = collect_files(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to walk"));
    }

    #[test]
    fn test_markdown_files_reports_read_errors() {
        let dir = TempDir::new().unwrap();
        assert!(markdown_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_collect_and_copy_recursive_and_overwrites() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("calculator")).unwrap();
        fs::write(src.path().join("calculator/handlers.py"), "new").unwrap();
        fs::write(src.path().join("README.md"), "# Examples").unwrap();
        fs::create_dir_all(src.path().join(".git")).unwrap();
        fs::write(src.path().join(".git/HEAD"), "ref").unwrap();

        fs::create_dir_all(dest.path().join("calculator")).unwrap();
        fs::write(dest.path().join("calculator/handlers.py"), "old").unwrap();

        let files = collect_files(src.path()).unwrap();
        assert_eq!(
            files,
            [PathBuf::from("README.md"), PathBuf::from("calculator/handlers.py")]
        );

        let mut seen = Vec::new();
        copy_files(src.path(), dest.path(), &files, |p| seen.push(p.to_path_buf())).unwrap();

        assert_eq!(seen, files);
        assert_eq!(
            fs::read_to_string(dest.path().join("calculator/handlers.py")).unwrap(),
            "new"
        );
        assert!(!dest.path().join(".git").exists());
    }
}
