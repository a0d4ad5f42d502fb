//! CLI command definitions and handlers

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use adr::cleanup::cleanup;
use adr::create::create_adr;
use adr::gate::{permission_table, Policy};
use adr::merge::merge_adr;
use adr::paths::find_root;
use adr::publish::open_pull_request;
use adr::query::{list_adrs, status_report};
use adr::validate::validate;
use adr::{ExternalTool, PermissionGate, TerminalConfirm, Workspace};

/// adr - Architecture Decision Record workflow
#[derive(Parser)]
#[command(name = "adr")]
#[command(version)]
#[command(about = "Create, list, validate and merge Architecture Decision Records")]
#[command(after_help = "\
EXAMPLES:
    adr new feature \"Use event sourcing\"   Create branches/feature/use-event-sourcing.md
    adr list --long                         Show indexed ADRs with status
    adr validate                            Check index entries against branches/
    adr merge feature/use-event-sourcing.md Stage with git and move into merged/
    adr permissions                         Show git/gh permission policies

LAYOUT:
    adr-index.toml               Index: [adr.<id>], [sections.<name>], [permissions]
    templates/adr-template.md    Template for new ADRs ({{TITLE}}, {{DATE}}, ...)
    branches/<category>/         Working ADRs
    merged/                      Merged ADRs

PERMISSIONS:
    never    Deny without asking
    ask      Prompt before running (default)
    yes      Run without asking")]
pub struct Cli {
    /// ADR root (default: nearest directory containing adr-index.toml)
    #[arg(long, global = true, env = "ADR_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that every indexed file exists under branches/
    Validate,

    /// List ADR identifiers from the index
    List {
        /// Include status, category and title
        #[arg(short, long)]
        long: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show section, ADR and merged-file counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new ADR from the template
    #[command(after_help = "Example: adr new architecture \"Adopt a message bus\"")]
    New {
        /// Category: feature, architecture, docs or process
        category: String,

        /// Human-readable title; slugified for the file name
        title: String,

        /// Also add a record to adr-index.toml
        #[arg(long)]
        register: bool,
    },

    /// Stage an ADR with git and move it into merged/
    Merge {
        /// ADR file (relative to the root or to branches/)
        path: PathBuf,

        /// Also update the matching record in adr-index.toml
        #[arg(long)]
        register: bool,
    },

    /// Move specialized docs into docs/ and offer to delete legacy ones
    Cleanup,

    /// Open a pull request for an ADR with gh
    Pr {
        /// ADR file (relative to the root or to branches/)
        path: PathBuf,
    },

    /// Show effective permission policies
    Permissions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Open the workspace at `--root` or the discovered root
pub fn open_workspace(root: Option<&Path>) -> Result<Workspace> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            find_root(&cwd)
        }
    };
    tracing::debug!(root = %root.display(), "opening ADR root");
    Workspace::open(root)
}

pub fn cmd_validate(ws: &Workspace) -> Result<()> {
    println!(
        "{}",
        format!("Validating {}", ws.paths.index.display()).bold()
    );

    let report = validate(ws)?;

    for warning in &report.warnings {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }
    println!(
        "{} {} file reference(s) checked, {} record(s) without a working file",
        "Validation complete:".green(),
        report.checked,
        report.skipped
    );
    Ok(())
}

pub fn cmd_list(ws: &Workspace, long: bool, json: bool) -> Result<()> {
    let Some(adrs) = list_adrs(ws) else {
        if json {
            println!("[]");
        } else {
            println!("{}", "No ADR index found".yellow());
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&adrs)?);
        return Ok(());
    }

    for adr in &adrs {
        if long {
            let status = adr.record.status.as_ref().map(|s| s.as_str()).unwrap_or("-");
            let category = adr.record.category.as_ref().map(|c| c.as_str()).unwrap_or("-");
            println!(
                "{:<10} {:<11} {:<13} {}",
                adr.id.cyan(),
                status,
                category,
                adr.record.title.as_deref().unwrap_or("").dimmed()
            );
        } else {
            println!("{}", adr.id);
        }
    }
    Ok(())
}

pub fn cmd_status(ws: &Workspace, json: bool) -> Result<()> {
    let report = status_report(ws);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "ADR Status".bold());
    println!("{}", "=".repeat(30));
    println!("Active sections:  {}", report.active_sections);
    println!("Total ADRs:       {}", report.total_adrs);
    println!("Merged files:     {}", report.merged_files);
    println!();

    let categories = if report.active_categories.is_empty() {
        "None".to_string()
    } else {
        report.active_categories.join(", ")
    };
    println!("Active categories: {}", categories);
    Ok(())
}

pub fn cmd_new(ws: &Workspace, category: &str, title: &str, register: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let created = create_adr(ws, category, title, today, register)?;

    println!(
        "{} {}",
        "Created:".green(),
        ws.paths.relative(&created.path).display()
    );
    match created.registered {
        Some(id) => println!("{} {}", "Registered as".green(), id),
        None => println!(
            "{}",
            "Remember to add this ADR to adr-index.toml".dimmed()
        ),
    }
    Ok(())
}

pub fn cmd_merge(ws: &Workspace, path: &Path, register: bool) -> Result<()> {
    let confirm = TerminalConfirm;
    let gate = PermissionGate::new(ws.index(), &confirm);
    let vcs = ExternalTool::vcs(&ws.paths.root, &gate);

    let merged = merge_adr(ws, &vcs, path, register)?;

    println!(
        "{} {} -> {}",
        "Merged:".green(),
        ws.paths.relative(&merged.from).display(),
        ws.paths.relative(&merged.to).display()
    );
    match merged.registered {
        Some(id) => println!("{} {}", "Updated index record".green(), id),
        None => println!(
            "{}",
            "Remember to update this ADR's status in adr-index.toml".dimmed()
        ),
    }
    Ok(())
}

pub fn cmd_cleanup(ws: &Workspace) -> Result<()> {
    let report = cleanup(ws, &TerminalConfirm)?;

    for name in &report.moved {
        println!("{} {} -> docs/{}", "Moved:".green(), name, name);
    }
    for name in &report.deleted {
        println!("{} {}", "Deleted:".red(), name);
    }
    for name in &report.kept {
        println!("{} {}", "Kept:".dimmed(), name);
    }
    for (name, reason) in &report.failed {
        eprintln!("{} {}: {}", "Skipped:".yellow(), name, reason);
    }

    if report.moved.is_empty() && report.deleted.is_empty() && report.failed.is_empty() {
        println!("{}", "Nothing to clean up".dimmed());
    }
    Ok(())
}

pub fn cmd_pr(ws: &Workspace, path: &Path) -> Result<()> {
    let confirm = TerminalConfirm;
    let gate = PermissionGate::new(ws.index(), &confirm);
    let hosting = ExternalTool::hosting(&ws.paths.root, &gate);

    let pr = open_pull_request(ws, &hosting, path)?;

    println!(
        "{} {} ({})",
        "Pull request opened:".green(),
        pr.title,
        ws.paths.relative(&pr.path).display()
    );
    Ok(())
}

pub fn cmd_permissions(ws: &Workspace, json: bool) -> Result<()> {
    let table = permission_table(ws.index());

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    if ws.index().is_none() {
        println!(
            "{}",
            "No ADR index found; every key falls back to ask".yellow()
        );
    }

    for entry in &table {
        let policy = match entry.policy {
            Policy::Yes => entry.policy.as_str().green(),
            Policy::Ask => entry.policy.as_str().blue(),
            Policy::Never => entry.policy.as_str().red(),
        };
        let note = match &entry.raw {
            Some(raw) => format!("({}: {})", entry.source, raw),
            None => format!("({})", entry.source),
        };
        println!("  {:<12} {:<6} {}", entry.key, policy, note.dimmed());
    }
    Ok(())
}
