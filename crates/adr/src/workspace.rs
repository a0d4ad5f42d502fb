//! Per-invocation context: the ADR root and its index, loaded once

use anyhow::Result;
use std::path::PathBuf;

use crate::index::{CleanupLists, Index};
use crate::paths::Paths;

/// ADR root with its index as read at the start of the invocation
#[derive(Debug, Clone)]
pub struct Workspace {
    pub paths: Paths,
    /// `None` when `adr-index.toml` does not exist
    pub index: Option<Index>,
}

impl Workspace {
    /// Open a root, reading the index if present
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let paths = Paths::new(root);
        let index = Index::load(&paths.index)?;
        Ok(Self { paths, index })
    }

    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    /// Cleanup lists from the index, or the built-in defaults
    pub fn cleanup_lists(&self) -> CleanupLists {
        self.index
            .as_ref()
            .map(|index| index.cleanup.clone())
            .unwrap_or_default()
    }
}
