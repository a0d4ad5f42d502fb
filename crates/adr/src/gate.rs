//! Permission gate for external tool calls
//!
//! Each wrapped action names a permission key. The key is looked up in the
//! `[permissions]` table of the index and resolves to one of three policies:
//! `never` (deny), `yes` (allow) or `ask` (prompt the operator).
//!
//! Resolution is pure; prompting goes through the [`Confirm`] capability so
//! the decision logic can be tested without a terminal.

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::io::{self, BufRead, Write};

use crate::index::Index;

/// Well-known permission keys
pub mod keys {
    /// Staging ADR files with the VCS client
    pub const ADD_FILES: &str = "add_files";
    /// Opening pull requests with the hosting CLI
    pub const CREATE_PR: &str = "create_pr";

    pub fn all() -> &'static [&'static str] {
        &[ADD_FILES, CREATE_PR]
    }
}

/// Permission policy for a gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Always deny
    Never,
    /// Prompt the operator
    #[default]
    Ask,
    /// Proceed without asking
    Yes,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Ask => "ask",
            Self::Yes => "yes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "never" => Some(Self::Never),
            "ask" => Some(Self::Ask),
            "yes" => Some(Self::Yes),
            _ => None,
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a permission key was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Value found in the index
    Configured(Policy),
    /// Key not set; caller's default applies
    Unset(Policy),
    /// No index loaded; always `ask`
    NoIndex,
    /// Stored value is not a known policy; treated as `ask`
    Unrecognized(String),
}

impl Resolution {
    /// Effective policy
    pub fn policy(&self) -> Policy {
        match self {
            Self::Configured(policy) | Self::Unset(policy) => *policy,
            Self::NoIndex | Self::Unrecognized(_) => Policy::Ask,
        }
    }
}

/// Resolve a permission key against an optional index
pub fn resolve(index: Option<&Index>, key: &str, default: Policy) -> Resolution {
    let Some(index) = index else {
        return Resolution::NoIndex;
    };

    match index.permission(key) {
        None => Resolution::Unset(default),
        Some(toml::Value::String(raw)) => match Policy::from_str(raw) {
            Some(policy) => Resolution::Configured(policy),
            None => Resolution::Unrecognized(raw.clone()),
        },
        Some(other) => Resolution::Unrecognized(other.to_string()),
    }
}

/// Effective policy for one key, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionEntry {
    pub key: String,
    pub policy: Policy,
    /// index, default, no-index or unrecognized
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Every configured key plus the well-known ones, sorted by key
pub fn permission_table(index: Option<&Index>) -> Vec<PermissionEntry> {
    let mut names: Vec<String> = keys::all().iter().map(|k| k.to_string()).collect();
    if let Some(index) = index {
        names.extend(index.permissions.keys().cloned());
    }
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|key| {
            let resolution = resolve(index, &key, Policy::Ask);
            let (source, raw) = match &resolution {
                Resolution::Configured(_) => ("index", None),
                Resolution::Unset(_) => ("default", None),
                Resolution::NoIndex => ("no-index", None),
                Resolution::Unrecognized(raw) => ("unrecognized", Some(raw.clone())),
            };
            PermissionEntry {
                policy: resolution.policy(),
                key,
                source,
                raw,
            }
        })
        .collect()
}

/// Interactive yes/no confirmation
pub trait Confirm {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Only a single `y` or `Y` counts as yes
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim(), "y" | "Y")
}

/// Read one answer line; end of input counts as no
pub fn read_answer(reader: &mut impl BufRead) -> Result<bool> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read confirmation")?;

    Ok(read > 0 && is_affirmative(&input))
}

/// Confirmation read from the operator's terminal.
///
/// Blocks until a line is entered.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        print!("{} [y/N] ", question);
        io::stdout().flush()?;

        read_answer(&mut io::stdin().lock())
    }
}

/// Gate consulted before every wrapped external command
pub struct PermissionGate<'a> {
    index: Option<&'a Index>,
    confirm: &'a dyn Confirm,
}

impl<'a> PermissionGate<'a> {
    pub fn new(index: Option<&'a Index>, confirm: &'a dyn Confirm) -> Self {
        Self { index, confirm }
    }

    /// Check a key with the default policy (`ask`)
    pub fn check(&self, label: &str, key: &str) -> Result<bool> {
        self.check_with_default(label, key, Policy::Ask)
    }

    /// Decide whether `label` may proceed under permission `key`
    pub fn check_with_default(&self, label: &str, key: &str, default: Policy) -> Result<bool> {
        let resolution = resolve(self.index, key, default);
        tracing::debug!(label, key, ?resolution, "permission check");

        match &resolution {
            Resolution::NoIndex => eprintln!(
                "{} no ADR index found, asking for '{}'",
                "Warning:".yellow(),
                key
            ),
            Resolution::Unrecognized(raw) => eprintln!(
                "{} unrecognized policy {} for '{}', asking instead",
                "Warning:".yellow(),
                raw,
                key
            ),
            Resolution::Configured(_) | Resolution::Unset(_) => {}
        }

        let allowed = match resolution.policy() {
            Policy::Never => {
                println!("{} {} ({} = never)", "Denied:".red(), label, key);
                false
            }
            Policy::Yes => {
                println!("{} {} ({} = yes)", "Auto-approved:".green(), label, key);
                true
            }
            Policy::Ask => self.confirm.confirm(&format!("Allow {}?", label))?,
        };

        Ok(allowed)
    }
}
