//! Standard paths inside an ADR root

use std::path::{Path, PathBuf};

/// File name of the index store
pub const INDEX_FILE: &str = "adr-index.toml";

/// Standard ADR paths, all relative to a single root
#[derive(Debug, Clone)]
pub struct Paths {
    /// ADR root directory
    pub root: PathBuf,
    /// Index store (<root>/adr-index.toml)
    pub index: PathBuf,
    /// Template store (<root>/templates/adr-template.md)
    pub template: PathBuf,
    /// Working ADRs (<root>/branches)
    pub branches: PathBuf,
    /// Merged ADRs (<root>/merged)
    pub merged: PathBuf,
    /// Auxiliary documents (<root>/docs)
    pub docs: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            index: root.join(INDEX_FILE),
            template: root.join("templates").join("adr-template.md"),
            branches: root.join("branches"),
            merged: root.join("merged"),
            docs: root.join("docs"),
            root,
        }
    }

    /// Path of a working ADR for a category and slug
    pub fn branch_file(&self, category: &str, slug: &str) -> PathBuf {
        self.branches.join(category).join(format!("{}.md", slug))
    }

    /// Strip the root prefix for display
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Resolve a user-supplied ADR path.
    ///
    /// Absolute paths are taken as-is. Relative paths are tried against the
    /// root, then against `branches/`. When neither exists the root-relative
    /// path is returned so callers can report it.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        let candidates = [self.root.join(path), self.branches.join(path)];
        for candidate in &candidates {
            if candidate.exists() {
                return candidate.clone();
            }
        }

        self.root.join(path)
    }
}

/// Find the ADR root by looking for the index file in `start` and its ancestors
pub fn find_root(start: &Path) -> PathBuf {
    let mut dir = start;

    loop {
        if dir.join(INDEX_FILE).exists() {
            return dir.to_path_buf();
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    // Fallback to the starting directory
    start.to_path_buf()
}
