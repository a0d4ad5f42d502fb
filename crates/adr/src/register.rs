//! Format-preserving index updates for `--register`
//!
//! Edits go through `toml_edit` so comments and layout written by hand
//! survive. Without `--register` the index is never written.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

use crate::error::AdrError;
use crate::index::next_id;
use crate::paths::Paths;
use crate::record::{AdrStatus, Category};

fn load_document(path: &Path) -> Result<DocumentMut> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read index: {}", path.display()))?;

    let doc = content
        .parse::<DocumentMut>()
        .map_err(|e| AdrError::IndexParse {
            path: path.to_path_buf(),
            message: e.to_string().trim().to_string(),
        })?;
    Ok(doc)
}

fn save_document(path: &Path, doc: &DocumentMut) -> Result<()> {
    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write index: {}", path.display()))
}

/// Get or create an implicit top-level table (`[adr.*]` style headers)
fn table_mut<'a>(doc: &'a mut DocumentMut, name: &str, path: &Path) -> Result<&'a mut Table> {
    if doc.get(name).is_none() {
        let mut table = Table::new();
        table.set_implicit(true);
        doc.insert(name, Item::Table(table));
    }

    doc[name].as_table_mut().ok_or_else(|| {
        AdrError::IndexParse {
            path: path.to_path_buf(),
            message: format!("'{}' must be a table", name),
        }
        .into()
    })
}

/// Add a record for a newly created ADR and return its identifier.
///
/// Creates the index when it does not exist yet. Only known categories get a
/// `[sections.<name>]` entry.
pub fn register_new(paths: &Paths, title: &str, category: &str, branch_file: &str) -> Result<String> {
    let mut doc = if paths.index.exists() {
        load_document(&paths.index)?
    } else {
        DocumentMut::new()
    };

    let id = {
        let ids: Vec<String> = doc
            .get("adr")
            .and_then(Item::as_table_like)
            .map(|t| t.iter().map(|(k, _)| k.to_string()).collect())
            .unwrap_or_default();
        next_id(ids.iter().map(String::as_str))
    };

    let known = Category::from_str(category);

    let mut entry = Table::new();
    entry.insert("title", value(title));
    entry.insert(
        "category",
        value(known.map(|c| c.as_str()).unwrap_or(category)),
    );
    entry.insert("status", value(AdrStatus::Proposed.as_str()));
    entry.insert("file", value(branch_file));
    table_mut(&mut doc, "adr", &paths.index)?.insert(&id, Item::Table(entry));

    if let Some(category) = known {
        let sections = table_mut(&mut doc, "sections", &paths.index)?;
        if !sections.contains_key(category.as_str()) {
            let mut section = Table::new();
            section.insert("active", value(true));
            sections.insert(category.as_str(), Item::Table(section));
        }
    }

    save_document(&paths.index, &doc)?;
    tracing::debug!(%id, file = branch_file, "registered ADR");
    Ok(id)
}

/// Point the record for `branch_file` at its merged copy and return its identifier.
///
/// The `file` key is replaced by `merged`, and a `proposed` status becomes
/// `accepted`.
pub fn register_merge(paths: &Paths, branch_file: &str, merged_name: &str) -> Result<String> {
    if !paths.index.exists() {
        return Err(AdrError::IndexMissing(paths.index.clone()).into());
    }

    let mut doc = load_document(&paths.index)?;
    let adrs = doc
        .get_mut("adr")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| AdrError::UnregisteredFile(branch_file.into()))?;

    let mut found = None;
    for (id, item) in adrs.iter_mut() {
        let Some(record) = item.as_table_like_mut() else {
            continue;
        };
        if record.get("file").and_then(Item::as_str) != Some(branch_file) {
            continue;
        }

        record.remove("file");
        record.insert("merged", value(merged_name));
        let status = record.get("status").and_then(Item::as_str);
        if status.and_then(AdrStatus::from_str) == Some(AdrStatus::Proposed) {
            record.insert("status", value(AdrStatus::Accepted.as_str()));
        }
        found = Some(id.get().to_string());
        break;
    }

    let id = found.ok_or_else(|| AdrError::UnregisteredFile(branch_file.into()))?;
    save_document(&paths.index, &doc)?;
    tracing::debug!(%id, merged = merged_name, "recorded merge");
    Ok(id)
}
