//! `merge`: stage an ADR and move it into `merged/`

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AdrError;
use crate::exec::{Executor, RunOutcome};
use crate::gate::keys;
use crate::register::register_merge;
use crate::workspace::Workspace;

/// Label shown by the permission gate
const STAGE_LABEL: &str = "staging ADR with git add";

/// A completed merge
#[derive(Debug, Clone)]
pub struct MergedAdr {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Identifier when `--register` updated the index
    pub registered: Option<String>,
}

/// Path below `branches/` with `/` separators, if `path` lives there
fn branch_file(ws: &Workspace, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(&ws.paths.branches).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Stage `path` through `vcs` under `add_files`, then move it into `merged/`.
///
/// Nothing is created when the source is missing. A denied or failed
/// `git add` leaves the source where it was.
pub fn merge_adr(ws: &Workspace, vcs: &dyn Executor, path: &Path, register: bool) -> Result<MergedAdr> {
    let source = ws.paths.resolve(path);
    if !source.is_file() {
        bail!(AdrError::SourceMissing(path.to_path_buf()));
    }

    let file_name = source
        .file_name()
        .with_context(|| format!("Not a file path: {}", source.display()))?
        .to_os_string();

    // With --register the record must exist before anything moves
    let record_file = if register {
        let rel = branch_file(ws, &source)
            .ok_or_else(|| AdrError::UnregisteredFile(source.clone()))?;
        let known = ws
            .index()
            .map(|index| index.find_by_file(&rel).is_some())
            .unwrap_or(false);
        if !known {
            bail!(AdrError::UnregisteredFile(PathBuf::from(rel)));
        }
        Some(rel)
    } else {
        None
    };

    fs::create_dir_all(&ws.paths.merged)
        .with_context(|| format!("Failed to create {}", ws.paths.merged.display()))?;

    let destination = ws.paths.merged.join(&file_name);
    if destination.exists() {
        bail!(AdrError::AlreadyExists(destination));
    }

    let stage_arg = ws.paths.relative(&source).to_string_lossy().into_owned();
    match vcs.run(STAGE_LABEL, keys::ADD_FILES, &["add".to_string(), stage_arg])? {
        RunOutcome::Denied => bail!(AdrError::PermissionDenied {
            label: STAGE_LABEL.to_string(),
            key: keys::ADD_FILES.to_string(),
        }),
        RunOutcome::Exited(code) if code != Some(0) => bail!(AdrError::CommandFailed {
            program: vcs.program().to_string(),
            code,
        }),
        RunOutcome::Exited(_) => {}
    }

    fs::rename(&source, &destination).with_context(|| {
        format!(
            "Failed to move {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    tracing::debug!(from = %source.display(), to = %destination.display(), "merged");

    let registered = match record_file {
        Some(rel) => Some(register_merge(
            &ws.paths,
            &rel,
            &file_name.to_string_lossy(),
        )?),
        None => None,
    };

    Ok(MergedAdr {
        from: source,
        to: destination,
        registered,
    })
}
