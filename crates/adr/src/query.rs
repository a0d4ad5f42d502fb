//! Read-only views of the index: `list` and `status`

use serde::Serialize;
use walkdir::WalkDir;

use crate::record::AdrRecord;
use crate::workspace::Workspace;

/// One listed ADR
#[derive(Debug, Clone, Serialize)]
pub struct ListedAdr {
    pub id: String,
    #[serde(flatten)]
    pub record: AdrRecord,
}

/// Records in index order, or `None` when there is no index
pub fn list_adrs(ws: &Workspace) -> Option<Vec<ListedAdr>> {
    let index = ws.index()?;
    Some(
        index
            .records()
            .map(|(id, record)| ListedAdr {
                id: id.to_string(),
                record: record.clone(),
            })
            .collect(),
    )
}

/// Summary counts; every field defaults to zero or empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub active_sections: usize,
    pub total_adrs: usize,
    pub merged_files: usize,
    pub active_categories: Vec<String>,
}

/// Count markdown documents anywhere under `merged/`
fn count_merged(ws: &Workspace) -> usize {
    if !ws.paths.merged.is_dir() {
        return 0;
    }

    WalkDir::new(&ws.paths.merged)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|ext| ext == "md").unwrap_or(false))
        .count()
}

pub fn status_report(ws: &Workspace) -> StatusReport {
    let mut report = StatusReport {
        merged_files: count_merged(ws),
        ..StatusReport::default()
    };

    if let Some(index) = ws.index() {
        let active = index.active_sections();
        report.active_sections = active.len();
        report.total_adrs = index.adr.len();
        report.active_categories = active.into_iter().map(String::from).collect();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_file, write_index};
    use tempfile::tempdir;

    #[test]
    fn test_list_without_index() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();
        assert!(list_adrs(&ws).is_none());
    }

    #[test]
    fn test_list_in_id_order() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            "[adr.ADR-010]\ntitle = \"Ten\"\n[adr.ADR-002]\ntitle = \"Two\"\nstatus = \"rejected\"\n",
        );
        let ws = Workspace::open(temp.path()).unwrap();

        let listed = list_adrs(&ws).unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ADR-002", "ADR-010"]);

        let json = serde_json::to_value(&listed[0]).unwrap();
        assert_eq!(json["id"], "ADR-002");
        assert_eq!(json["status"], "rejected");
    }

    #[test]
    fn test_status_defaults_without_data() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();
        assert_eq!(status_report(&ws), StatusReport::default());
    }

    #[test]
    fn test_status_counts() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            r#"
[sections.feature]
[sections.docs]
active = false
[sections.process]
active = true

[adr.ADR-001]
[adr.ADR-002]
[adr.ADR-003]
"#,
        );
        write_file(temp.path(), "merged/one.md", "# One");
        write_file(temp.path(), "merged/2024/two.md", "# Two");
        write_file(temp.path(), "merged/notes.txt", "not an ADR");
        let ws = Workspace::open(temp.path()).unwrap();

        let report = status_report(&ws);
        assert_eq!(report.active_sections, 2);
        assert_eq!(report.total_adrs, 3);
        assert_eq!(report.merged_files, 2);
        assert_eq!(report.active_categories, vec!["feature", "process"]);
    }

    #[test]
    fn test_hand_edited_keywords_still_load() {
        let temp = tempdir().unwrap();
        write_index(
            temp.path(),
            "[sections.security]\n\n[adr.ADR-001]\nstatus = \"Accepted\"\ncategory = \"security\"\n",
        );
        let ws = Workspace::open(temp.path()).unwrap();

        let report = status_report(&ws);
        assert_eq!(report.total_adrs, 1);
        assert_eq!(report.active_categories, vec!["security"]);

        let listed = list_adrs(&ws).unwrap();
        assert_eq!(listed[0].record.status.as_ref().map(|s| s.as_str()), Some("accepted"));
        assert_eq!(listed[0].record.category.as_ref().map(|c| c.as_str()), Some("security"));
    }
}
