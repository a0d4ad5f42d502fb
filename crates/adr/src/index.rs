//! Index store: `adr-index.toml`
//!
//! The index lists ADR records under `[adr.<id>]`, category sections under
//! `[sections.<name>]`, tool permissions under `[permissions]` and optional
//! cleanup lists under `[cleanup]`. It is read once per invocation.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::AdrError;
use crate::record::AdrRecord;

static ADR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ADR-(\d+)$").expect("valid ADR id regex"));

/// A category section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Default for Section {
    fn default() -> Self {
        Self {
            active: true,
            description: None,
        }
    }
}

/// Documents handled by `cleanup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupLists {
    /// Moved into `docs/` without asking
    #[serde(default = "default_specialized")]
    pub specialized: Vec<String>,

    /// Deleted after confirmation
    #[serde(default = "default_legacy")]
    pub legacy: Vec<String>,
}

fn default_specialized() -> Vec<String> {
    vec![
        "ADR-WORKFLOW.md".into(),
        "PERMISSIONS.md".into(),
        "TEMPLATE-GUIDE.md".into(),
    ]
}

fn default_legacy() -> Vec<String> {
    vec![
        "ADR-LIST.md".into(),
        "adr-index.md".into(),
        "README.old.md".into(),
    ]
}

impl Default for CleanupLists {
    fn default() -> Self {
        Self {
            specialized: default_specialized(),
            legacy: default_legacy(),
        }
    }
}

/// Parsed index store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub sections: BTreeMap<String, Section>,

    /// ADR records keyed by identifier
    #[serde(default)]
    pub adr: BTreeMap<String, AdrRecord>,

    /// Permission policies, kept raw so unknown values can be reported
    #[serde(default)]
    pub permissions: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub cleanup: CleanupLists,
}

impl Index {
    /// Load the index, returning `None` when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no index store");
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        Self::parse(&content, path).map(Some)
    }

    /// Parse index content; `path` is only used for error reporting
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let index: Index = toml::from_str(content).map_err(|e| AdrError::IndexParse {
            path: path.to_path_buf(),
            message: e.to_string().trim().to_string(),
        })?;

        tracing::debug!(
            records = index.adr.len(),
            sections = index.sections.len(),
            permissions = index.permissions.len(),
            "loaded index"
        );
        Ok(index)
    }

    /// Records in identifier order
    pub fn records(&self) -> impl Iterator<Item = (&str, &AdrRecord)> {
        self.adr.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Names of sections marked active
    pub fn active_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|(_, section)| section.active)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Raw permission value for a key
    pub fn permission(&self, key: &str) -> Option<&toml::Value> {
        self.permissions.get(key)
    }

    /// Find the record whose `file` points at `branch_path` (relative to `branches/`)
    pub fn find_by_file(&self, branch_path: &str) -> Option<(&str, &AdrRecord)> {
        self.records()
            .find(|(_, record)| record.file.as_deref() == Some(branch_path))
    }

    /// Next free `ADR-NNN` identifier
    pub fn next_id(&self) -> String {
        next_id(self.adr.keys().map(String::as_str))
    }
}

/// Next `ADR-NNN` identifier after the highest numbered one in `ids`
pub fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let highest = ids
        .filter_map(|id| ADR_ID.captures(id))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("ADR-{:03}", highest + 1)
}
