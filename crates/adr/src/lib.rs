//! adr - Architecture Decision Record workflow
//!
//! ADRs are markdown files under `branches/<category>/`, tracked by a TOML
//! index (`adr-index.toml`). Accepted ADRs move into `merged/`. The index
//! also holds a permission table that gates every call to `git` and `gh`:
//! `never` denies, `yes` proceeds, `ask` prompts the operator.
//!
//! The index is read once per invocation into a [`Workspace`] and handed to
//! each operation. It is only written back when `--register` is given.

pub mod cleanup;
pub mod create;
pub mod error;
pub mod exec;
pub mod gate;
pub mod index;
pub mod merge;
pub mod paths;
pub mod publish;
pub mod query;
pub mod record;
pub mod register;
pub mod template;
pub mod validate;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AdrError;
pub use exec::{Executor, ExternalTool, RunOutcome};
pub use gate::{Confirm, PermissionGate, Policy, TerminalConfirm};
pub use index::Index;
pub use paths::Paths;
pub use record::{slugify, AdrRecord, AdrStatus, Category, Keyword, Lenient};
pub use workspace::Workspace;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_index;
    use chrono::Local;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_new_validate_list_scenario() {
        let temp = tempdir().unwrap();
        write_index(temp.path(), "[permissions]\nadd_files = \"ask\"\n");
        let index_before = fs::read_to_string(temp.path().join("adr-index.toml")).unwrap();

        let ws = Workspace::open(temp.path()).unwrap();
        let today = Local::now().date_naive();
        let created = create::create_adr(&ws, "feat", "My Decision", today, false).unwrap();

        assert_eq!(created.path, temp.path().join("branches/feat/my-decision.md"));
        let content = fs::read_to_string(&created.path).unwrap();
        assert!(content.lines().any(|l| l == "Status: Proposed"));
        assert!(content.contains(&today.format("%Y-%m-%d").to_string()));

        let ws = Workspace::open(temp.path()).unwrap();
        let report = validate::validate(&ws).unwrap();
        assert_eq!(report.checked, 0);

        let listed = query::list_adrs(&ws).unwrap();
        assert!(listed.is_empty());

        let index_after = fs::read_to_string(temp.path().join("adr-index.toml")).unwrap();
        assert_eq!(index_before, index_after);
    }
}
