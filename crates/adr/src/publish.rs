//! `pr`: open a pull request for an ADR through the hosting CLI

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AdrError;
use crate::exec::{Executor, RunOutcome};
use crate::gate::keys;
use crate::workspace::Workspace;

const PR_LABEL: &str = "opening a pull request with gh";

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub path: PathBuf,
    pub title: String,
}

/// First `# ` heading of a markdown document, if any
pub fn document_title(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

pub fn open_pull_request(ws: &Workspace, hosting: &dyn Executor, path: &Path) -> Result<PullRequest> {
    let source = ws.paths.resolve(path);
    if !source.is_file() {
        bail!(AdrError::SourceMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(&source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let title = document_title(&content).unwrap_or_else(|| {
        source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let args = vec![
        "pr".to_string(),
        "create".to_string(),
        "--title".to_string(),
        title.clone(),
        "--body-file".to_string(),
        ws.paths.relative(&source).to_string_lossy().into_owned(),
    ];

    match hosting.run(PR_LABEL, keys::CREATE_PR, &args)? {
        RunOutcome::Denied => bail!(AdrError::PermissionDenied {
            label: PR_LABEL.to_string(),
            key: keys::CREATE_PR.to_string(),
        }),
        RunOutcome::Exited(code) if code != Some(0) => bail!(AdrError::CommandFailed {
            program: hosting.program().to_string(),
            code,
        }),
        RunOutcome::Exited(_) => {}
    }

    Ok(PullRequest {
        path: source,
        title,
    })
}
