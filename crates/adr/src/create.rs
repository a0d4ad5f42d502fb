//! `new`: create an ADR from the template store

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::AdrError;
use crate::record::{slugify, Category};
use crate::register::register_new;
use crate::template::{render, Variables};
use crate::workspace::Workspace;

/// A freshly created ADR
#[derive(Debug, Clone)]
pub struct CreatedAdr {
    pub path: PathBuf,
    pub category: String,
    pub slug: String,
    /// Identifier when `--register` added it to the index
    pub registered: Option<String>,
}

impl CreatedAdr {
    /// Path relative to `branches/`, as stored in an index record
    pub fn branch_file(&self) -> String {
        format!("{}/{}.md", self.category, self.slug)
    }
}

/// Create `branches/<category>/<slug>.md` for `title`.
///
/// Fails when the title or category has no usable characters, or when the
/// target already exists; an existing file is never overwritten.
pub fn create_adr(
    ws: &Workspace,
    category: &str,
    title: &str,
    today: NaiveDate,
    register: bool,
) -> Result<CreatedAdr> {
    let slug = slugify(title);
    if slug.is_empty() {
        bail!(AdrError::EmptySlug(title.to_string()));
    }

    let category_dir = slugify(category);
    if category_dir.is_empty() {
        bail!(AdrError::EmptySlug(category.to_string()));
    }
    if Category::from_str(&category_dir).is_none() {
        tracing::warn!(category = %category_dir, "category is not one of feature, architecture, docs, process");
    }

    let path = ws.paths.branch_file(&category_dir, &slug);
    if path.exists() {
        bail!(AdrError::AlreadyExists(path));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let vars = Variables::for_adr(title.trim(), &category_dir, &slug, today);
    let content = render(&ws.paths.template, &vars)?;

    // Never clobber a file created after the existence check
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!(AdrError::AlreadyExists(path)),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create ADR: {}", path.display()))
        }
    };
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write ADR: {}", path.display()))?;

    let mut created = CreatedAdr {
        path,
        category: category_dir,
        slug,
        registered: None,
    };

    if register {
        let id = register_new(&ws.paths, title.trim(), &created.category, &created.branch_file())?;
        created.registered = Some(id);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_file, write_index};
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_create_with_builtin_template() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();

        let created = create_adr(&ws, "feat", "My Decision", today(), false).unwrap();

        assert_eq!(created.path, temp.path().join("branches/feat/my-decision.md"));
        assert_eq!(created.branch_file(), "feat/my-decision.md");
        let content = fs::read_to_string(&created.path).unwrap();
        assert!(content.lines().any(|l| l == "Status: Proposed"));
        assert!(content.contains("2025-01-15"));
        assert!(created.registered.is_none());
    }

    #[test]
    fn test_create_uses_template_store() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "templates/adr-template.md", "# {{TITLE}}\nDate: {{DATE}}\n");
        let ws = Workspace::open(temp.path()).unwrap();

        let created = create_adr(&ws, "architecture", "Event Log", today(), false).unwrap();
        assert_eq!(
            fs::read_to_string(&created.path).unwrap(),
            "# Event Log\nDate: 2025-01-15\n"
        );
    }

    #[test]
    fn test_create_twice_fails_without_overwrite() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();

        let created = create_adr(&ws, "docs", "Style Guide", today(), false).unwrap();
        fs::write(&created.path, "edited by hand").unwrap();

        let err = create_adr(&ws, "docs", "Style Guide", today(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdrError>(),
            Some(AdrError::AlreadyExists(p)) if p == &created.path
        ));
        assert_eq!(fs::read_to_string(&created.path).unwrap(), "edited by hand");
    }

    #[test]
    fn test_path_depends_only_on_category_and_slug() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();

        create_adr(&ws, "process", "Release Train", today(), false).unwrap();
        // Same slug, different spelling: same target
        let err = create_adr(&ws, "process", "  release   TRAIN!", today(), false).unwrap_err();
        assert!(matches!(err.downcast_ref::<AdrError>(), Some(AdrError::AlreadyExists(_))));
        // Different category: different target
        assert!(create_adr(&ws, "feature", "Release Train", today(), false).is_ok());
    }

    #[test]
    fn test_create_rejects_empty_slug() {
        let temp = tempdir().unwrap();
        let ws = Workspace::open(temp.path()).unwrap();

        let err = create_adr(&ws, "feature", "!!!", today(), false).unwrap_err();
        assert!(matches!(err.downcast_ref::<AdrError>(), Some(AdrError::EmptySlug(_))));
        assert!(!temp.path().join("branches").exists());
    }

    #[test]
    fn test_create_leaves_index_untouched_by_default() {
        let temp = tempdir().unwrap();
        write_index(temp.path(), "# curated by hand\n");
        let ws = Workspace::open(temp.path()).unwrap();

        create_adr(&ws, "feature", "Quiet", today(), false).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("adr-index.toml")).unwrap(),
            "# curated by hand\n"
        );
    }

    #[test]
    fn test_create_and_register() {
        let temp = tempdir().unwrap();
        write_index(temp.path(), "[adr.ADR-001]\nfile = \"feature/old.md\"\n");
        let ws = Workspace::open(temp.path()).unwrap();

        let created = create_adr(&ws, "feature", "Loud", today(), true).unwrap();
        assert_eq!(created.registered.as_deref(), Some("ADR-002"));

        let reopened = Workspace::open(temp.path()).unwrap();
        let index = reopened.index().unwrap();
        assert_eq!(
            index.find_by_file("feature/loud.md").map(|(id, _)| id),
            Some("ADR-002")
        );
    }
}
