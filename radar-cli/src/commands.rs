//! Radar CLI commands
//!
//! Each command returns its printable output; `main` only decides where it
//! goes and what the exit code is.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use radar_core::authoring::pull_request_url;
use radar_core::{
    apply_review, extract_recent_changes_at, find_blip, new_blip, quadrant_index, radar_data,
    render_document, slugify, split_front_matter, validate_blip_value, BlipRecord, ChangeLogEntry,
    ChangeReport, ConfigError, NewBlip, RadarConfig, ReviewUpdate, Ring, ValidationReport,
    ValidationSummary,
};
use tracing::info;

use crate::loader::{collect_markdown, load_blips, load_config, write_file, FileError};

/// Radar CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the config and every content file
    Validate,

    /// Write the radar data and changelog JSON artifacts
    Build {
        /// Output directory
        #[arg(short, long, env = "RADAR_OUT", default_value = "dist")]
        out: PathBuf,
    },

    /// Show recent ring changes, grouped by direction
    Changes {
        /// Window in days (defaults to changelog_days from the config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Record a review of an existing blip
    UpdateStatus {
        /// Blip name or slug
        name: String,
        /// New ring (Adopt, Trial, Assess, Hold)
        #[arg(long, value_parser = parse_ring)]
        ring: Ring,
        /// Reason for the change
        #[arg(long)]
        note: String,
        /// Pull request number (#123 or 123)
        #[arg(long)]
        pr: Option<String>,
        /// Reviewer handle appended to the note
        #[arg(long)]
        reviewed_by: Option<String>,
    },

    /// Create a new blip file
    New {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quadrant: String,
        #[arg(long, value_parser = parse_ring)]
        ring: Ring,
        #[arg(long)]
        summary: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Owner (repeatable)
        #[arg(long = "owner")]
        owners: Vec<String>,
    },
}

/// Ring label from the command line, ignoring case.
pub fn parse_ring(label: &str) -> Result<Ring, String> {
    Ring::ALL
        .into_iter()
        .find(|ring| ring.as_str().eq_ignore_ascii_case(label.trim()))
        .ok_or_else(|| format!("expected one of Adopt, Trial, Assess, Hold; got '{label}'"))
}

/// Where the radar lives on disk.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config_path: PathBuf,
    pub content_dir: PathBuf,
}

/// Printable result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, success: true }
    }
}

/// Run a command as of `now`.
pub fn execute_command(
    workspace: &Workspace,
    command: Commands,
    now: DateTime<Utc>,
) -> anyhow::Result<CommandOutput> {
    match command {
        Commands::Validate => validate(workspace),
        Commands::Build { out } => build(workspace, &out, now),
        Commands::Changes { days } => changes(workspace, days, now),
        Commands::UpdateStatus {
            name,
            ring,
            note,
            pr,
            reviewed_by,
        } => update_status(
            workspace,
            &name,
            ReviewUpdate {
                ring,
                note,
                pr,
                reviewed_by,
                date: now.date_naive(),
            },
        ),
        Commands::New {
            name,
            quadrant,
            ring,
            summary,
            tags,
            owners,
        } => create(
            workspace,
            NewBlip {
                name,
                quadrant,
                ring,
                summary,
                tags,
                owners,
                links: Vec::new(),
            },
            now,
        ),
    }
}

fn validate(workspace: &Workspace) -> anyhow::Result<CommandOutput> {
    let mut out = String::new();
    let mut summary = ValidationSummary::default();

    let config = match load_config(&workspace.config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            summary.record_error();
            let errors = match e {
                FileError::Config {
                    source: ConfigError::Schema(schema),
                    ..
                } => schema.messages(),
                other => vec![other.to_string()],
            };
            let report = ValidationReport {
                valid: false,
                errors,
                warnings: Vec::new(),
            };
            write_report(&mut out, &workspace.config_path, &report)?;
            None
        }
    };

    for path in collect_markdown(&workspace.content_dir)? {
        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let report = match split_front_matter(&text) {
            Ok((raw, _)) => validate_blip_value(&raw, config.as_ref()),
            Err(e) => ValidationReport {
                valid: false,
                errors: vec![e.to_string()],
                warnings: Vec::new(),
            },
        };
        summary.record(&report);
        write_report(&mut out, &path, &report)?;
    }

    writeln!(
        out,
        "\n{} valid, {} with warnings, {} with errors",
        summary.valid, summary.warnings, summary.errors
    )?;
    info!(
        valid = summary.valid,
        warnings = summary.warnings,
        errors = summary.errors,
        "Validation finished"
    );
    Ok(CommandOutput {
        text: out,
        success: summary.passed(),
    })
}

fn write_report(out: &mut String, path: &Path, report: &ValidationReport) -> std::fmt::Result {
    let marker = if !report.valid {
        "✗"
    } else if report.has_warnings() {
        "⚠"
    } else {
        "✓"
    };
    writeln!(out, "{marker} {}", path.display())?;
    for error in &report.errors {
        writeln!(out, "    error: {error}")?;
    }
    for warning in &report.warnings {
        writeln!(out, "    warning: {warning}")?;
    }
    Ok(())
}

fn load_valid(workspace: &Workspace) -> anyhow::Result<(RadarConfig, Vec<BlipRecord>)> {
    let config = load_config(&workspace.config_path)?;
    let loaded = load_blips(&workspace.content_dir)?;
    if let Some(failure) = loaded.failures.first() {
        bail!(
            "{} invalid blip file(s), first: {}: {}",
            loaded.failures.len(),
            failure.path.display(),
            failure.error
        );
    }
    Ok((config, loaded.blips))
}

fn build(workspace: &Workspace, out_dir: &Path, now: DateTime<Utc>) -> anyhow::Result<CommandOutput> {
    let (config, blips) = load_valid(workspace)?;

    let data = radar_data(&blips, &config)?;
    let entries_path = out_dir.join("data").join("entries.json");
    write_file(&entries_path, &serde_json::to_string_pretty(&data)?)?;

    let changes = extract_recent_changes_at(&blips, config.changelog_days, now);
    let changelog_path = out_dir.join("data").join("changelog.json");
    write_file(&changelog_path, &serde_json::to_string_pretty(&changes)?)?;

    info!(
        entries = data.entries.len(),
        changes = changes.len(),
        out = %out_dir.display(),
        "Build complete"
    );
    Ok(CommandOutput::ok(format!(
        "Wrote {} entries to {}\nWrote {} changes to {}\n",
        data.entries.len(),
        entries_path.display(),
        changes.len(),
        changelog_path.display()
    )))
}

fn changes(workspace: &Workspace, days: Option<u32>, now: DateTime<Utc>) -> anyhow::Result<CommandOutput> {
    let (config, blips) = load_valid(workspace)?;
    let days = days.unwrap_or(config.changelog_days);
    let report = ChangeReport::from_changes(&extract_recent_changes_at(&blips, days, now));

    let mut out = String::new();
    if report.is_empty() {
        writeln!(out, "No changes in the last {days} days")?;
        return Ok(CommandOutput::ok(out));
    }

    writeln!(out, "{} change(s) in the last {days} days", report.total())?;
    let groups = [
        ("New", &report.new_entries),
        ("Moved in", &report.moved_in),
        ("Moved out", &report.moved_out),
        ("Re-reviewed", &report.re_reviewed),
    ];
    for (title, entries) in groups {
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "\n{title}:")?;
        for change in entries {
            writeln!(out, "  {}", describe_change(change, &config.repo_url))?;
        }
    }
    Ok(CommandOutput::ok(out))
}

fn describe_change(change: &ChangeLogEntry, repo_url: &str) -> String {
    let rings = match change.from_ring {
        Some(from) => format!("{from} -> {}", change.to_ring),
        None => change.to_ring.to_string(),
    };
    let mut line = format!("{} {} ({rings}): {}", change.date, change.blip_name, change.note);
    if let Some(pr) = &change.pr {
        line.push_str(&format!(" [{}]", pull_request_url(repo_url, pr)));
    }
    line
}

fn update_status(workspace: &Workspace, name: &str, update: ReviewUpdate) -> anyhow::Result<CommandOutput> {
    let loaded = load_blips(&workspace.content_dir)?;
    let Some(blip) = find_blip(&loaded.blips, name) else {
        bail!("Blip not found: {name}");
    };
    let Some(source) = blip.source.clone() else {
        bail!("Blip {} has no source file", blip.name);
    };

    let from = blip.ring;
    let updated = apply_review(blip, update)?;
    write_file(&source, &render_document(&updated)?)?;

    info!(blip = %updated.name, file = %source.display(), "Updated blip");
    Ok(CommandOutput::ok(format!(
        "Updated {}: {from} -> {} ({})\n",
        updated.name, updated.ring, updated.status
    )))
}

fn create(workspace: &Workspace, input: NewBlip, now: DateTime<Utc>) -> anyhow::Result<CommandOutput> {
    let config = load_config(&workspace.config_path)?;
    let index = quadrant_index(&input.quadrant, &config.quadrants)?;
    let quadrant = config.quadrants[usize::from(index)].clone();

    let blip = new_blip(NewBlip { quadrant, ..input }, now.date_naive())?;
    let path = workspace
        .content_dir
        .join(slugify(&blip.quadrant))
        .join(format!("{}.md", blip.slug));
    if path.exists() {
        bail!("Refusing to overwrite {}", path.display());
    }
    write_file(&path, &render_document(&blip)?)?;

    info!(blip = %blip.name, file = %path.display(), "Created blip");
    Ok(CommandOutput::ok(format!("Created {}\n", path.display())))
}
