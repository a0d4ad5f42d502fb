//! ADR document templates
//!
//! The template store is a markdown file that may contain `{{PLACEHOLDER}}`
//! variables. When the store is absent a built-in document is used instead.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::record::AdrStatus;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_][A-Z0-9_]*)\}\}").expect("valid placeholder regex"));

/// Fallback document when `templates/adr-template.md` is missing
pub const BUILTIN_TEMPLATE: &str = "\
# {{TITLE}}

Status: {{STATUS}}
Date: {{DATE}}
Category: {{CATEGORY}}

## Context

What is the issue that motivates this decision?

## Decision

What is the change being proposed?

## Consequences

What becomes easier or harder because of this change?

## Alternatives Considered

What other options were evaluated, and why were they rejected?
";

/// Values substituted into a template
#[derive(Debug, Clone)]
pub struct Variables {
    vars: HashMap<String, String>,
}

impl Variables {
    /// Standard variables for a new ADR
    pub fn for_adr(title: &str, category: &str, slug: &str, date: NaiveDate) -> Self {
        let mut vars = HashMap::new();
        vars.insert("TITLE".to_string(), title.to_string());
        vars.insert("CATEGORY".to_string(), category.to_string());
        vars.insert("SLUG".to_string(), slug.to_string());
        vars.insert("DATE".to_string(), date.format("%Y-%m-%d").to_string());
        vars.insert("STATUS".to_string(), AdrStatus::Proposed.label().to_string());
        Self { vars }
    }

    /// Replace known `{{PLACEHOLDER}}`s; unknown ones are left untouched
    pub fn substitute(&self, content: &str) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let key = &caps[1];
                self.vars
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Render the template store document, or the built-in one if it is absent
pub fn render(template_path: &Path, vars: &Variables) -> Result<String> {
    let source = if template_path.exists() {
        tracing::debug!(path = %template_path.display(), "using template store");
        fs::read_to_string(template_path)
            .with_context(|| format!("Failed to read template: {}", template_path.display()))?
    } else {
        tracing::debug!("template store missing, using built-in document");
        BUILTIN_TEMPLATE.to_string()
    };

    Ok(vars.substitute(&source))
}
