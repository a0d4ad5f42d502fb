//! `validate`: check that every indexed working file exists

use anyhow::{bail, Result};

use crate::error::AdrError;
use crate::workspace::Workspace;

/// Outcome of a clean validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Records whose `file` was found under `branches/`
    pub checked: usize,
    /// Records without a `file` key
    pub skipped: usize,
    /// Non-fatal problems, such as unrecognized status or category values
    pub warnings: Vec<String>,
}

/// Verify every `file = "..."` reference against `branches/`.
///
/// A missing index is fatal here, unlike the other operations. The first
/// missing file aborts the pass. Unrecognized keywords are only warnings.
pub fn validate(ws: &Workspace) -> Result<ValidationReport> {
    let Some(index) = ws.index() else {
        bail!(AdrError::IndexMissing(ws.paths.index.clone()));
    };

    let mut report = ValidationReport::default();

    for (id, record) in index.records() {
        for problem in record.unrecognized() {
            tracing::warn!(%id, "{}", problem);
            report.warnings.push(format!("{}: {}", id, problem));
        }

        let Some(file) = record.file.as_deref() else {
            report.skipped += 1;
            continue;
        };

        let path = ws.paths.branches.join(file);
        if !path.is_file() {
            bail!(AdrError::ReferencedFileMissing {
                id: id.to_string(),
                path: ws.paths.relative(&path).to_path_buf(),
            });
        }

        tracing::debug!(%id, path = %path.display(), "reference ok");
        report.checked += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_file, write_index};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_missing_index_is_fatal() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();

        let err = validate(&ws).unwrap_err();
        assert!(matches!(err.downcast_ref::<AdrError>(), Some(AdrError::IndexMissing(_))));
    }

    #[test]
    fn test_zero_records_passes() {
        let temp = tempdir().unwrap();
        write_index(temp.path(), "[permissions]\nadd_files = \"ask\"\n");
        let ws = Workspace::open(temp.path()).unwrap();

        assert_eq!(validate(&ws).unwrap(), ValidationReport::default());
    }

    #[test]
    fn test_missing_reference_names_path() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            "[adr.ADR-001]\nfile = \"feature/present.md\"\n[adr.ADR-002]\nfile = \"feature/gone.md\"\n",
        );
        write_file(temp.path(), "branches/feature/present.md", "# Present");
        let ws = Workspace::open(temp.path()).unwrap();

        let err = validate(&ws).unwrap_err();
        assert!(err.to_string().contains("branches/feature/gone.md"));
        match err.downcast_ref::<AdrError>() {
            Some(AdrError::ReferencedFileMissing { id, path }) => {
                assert_eq!(id, "ADR-002");
                assert_eq!(path, &PathBuf::from("branches/feature/gone.md"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_merged_records_are_skipped() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            "[adr.ADR-001]\nmerged = \"old.md\"\n[adr.ADR-002]\nfile = \"docs/live.md\"\n",
        );
        write_file(temp.path(), "branches/docs/live.md", "# Live");
        let ws = Workspace::open(temp.path()).unwrap();

        assert_eq!(
            validate(&ws).unwrap(),
            ValidationReport {
                checked: 1,
                skipped: 1,
                warnings: Vec::new(),
            }
        );
    }

    #[test]
    fn test_unrecognized_keywords_are_warnings() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            "[adr.ADR-001]\nstatus = \"Accepted\"\ncategory = \"security\"\nfile = \"security/keys.md\"\n\n[adr.ADR-002]\nstatus = \"final\"\n",
        );
        write_file(temp.path(), "branches/security/keys.md", "# Keys");
        let ws = Workspace::open(temp.path()).unwrap();

        let report = validate(&ws).unwrap();

        assert_eq!(report.checked, 1);
        assert_eq!(
            report.warnings,
            vec![
                "ADR-001: unrecognized category 'security'",
                "ADR-002: unrecognized status 'final'",
            ]
        );
    }
}
