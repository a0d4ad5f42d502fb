//! `cleanup`: tidy auxiliary documents in the ADR root
//!
//! Specialized documents move into `docs/` without asking. Legacy documents
//! are deleted one by one after a direct confirmation. Work is best-effort:
//! a failure on one file is reported and the rest continue.

use anyhow::{Context, Result};
use std::fs;

use crate::gate::Confirm;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Moved into `docs/`
    pub moved: Vec<String>,
    /// Legacy documents deleted
    pub deleted: Vec<String>,
    /// Legacy documents the operator chose to keep
    pub kept: Vec<String>,
    /// File name and reason for anything that could not be handled
    pub failed: Vec<(String, String)>,
}

pub fn cleanup(ws: &Workspace, confirm: &dyn Confirm) -> Result<CleanupReport> {
    let docs = &ws.paths.docs;
    fs::create_dir_all(docs).with_context(|| format!("Failed to create {}", docs.display()))?;

    let lists = ws.cleanup_lists();
    let mut report = CleanupReport::default();

    for name in &lists.specialized {
        let source = ws.paths.root.join(name);
        if !source.is_file() {
            continue;
        }

        let target = docs.join(name);
        if target.exists() {
            report
                .failed
                .push((name.clone(), "already present in docs/".to_string()));
            continue;
        }

        match fs::rename(&source, &target) {
            Ok(()) => report.moved.push(name.clone()),
            Err(e) => report.failed.push((name.clone(), e.to_string())),
        }
    }

    for name in &lists.legacy {
        let path = ws.paths.root.join(name);
        if !path.is_file() {
            continue;
        }

        if !confirm.confirm(&format!("Delete legacy document {}?", name))? {
            report.kept.push(name.clone());
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => report.deleted.push(name.clone()),
            Err(e) => report.failed.push((name.clone(), e.to_string())),
        }
    }

    tracing::debug!(?report, "cleanup finished");
    Ok(report)
}
