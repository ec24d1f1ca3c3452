//! `cicd-public distribute`: copy the template set into every opted-in project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use cicd_core::{
    config::{self, Settings},
    ConfigError, CopyOutcome, StatusKind,
};
use cicd_discovery::FilesystemDiscovery;
use cicd_sync::{pipeline, DistributionPlan, DistributionReport, FilesystemCopier};

/// Arguments for `cicd-public distribute`.
#[derive(Args, Debug)]
pub struct DistributeArgs {
    /// Source .github/ directory to copy from. Auto-detected if not specified.
    #[arg(long, value_name = "DIR", env = config::SOURCE_ENV)]
    pub source: Option<PathBuf>,

    /// Root directory to search from. Defaults to the filesystem root (/ or C:\).
    #[arg(long, value_name = "DIR", env = config::SEARCH_ROOT_ENV)]
    pub search_root: Option<PathBuf>,

    /// Show what would be copied without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed per-project output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit a machine-readable JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when any project could not be updated.
    #[arg(long)]
    pub strict: bool,
}

impl DistributeArgs {
    pub fn run(self) -> Result<ExitCode> {
        let plan = self.plan()?;
        tracing::debug!(
            source = %plan.source_dir.display(),
            search_root = %plan.search_root.display(),
            dry_run = plan.dry_run,
            "resolved distribution plan"
        );
        let text_verbose = self.verbose && !self.json;

        if text_verbose {
            println!("{} {}", "Source .github/:".dimmed(), plan.source_dir.display());
            println!("{} {}", "Search root:".dimmed(), plan.search_root.display());
            if plan.dry_run {
                println!("{}", "DRY RUN - no changes will be made".yellow());
            }
            println!();
        }

        let targets = pipeline::collect_targets(&FilesystemDiscovery, &plan);
        if text_verbose && targets.excluded_self > 0 {
            println!("{}", "Skipping the template source project.".dimmed());
        }

        if targets.projects.is_empty() && !self.json {
            println!("{}", "No target projects found.".yellow());
            return Ok(ExitCode::SUCCESS);
        }

        if !self.json {
            println!(
                "Found {} target project(s)",
                targets.projects.len().to_string().bold()
            );
            println!();
        }

        let report = pipeline::sync_targets(&FilesystemCopier, &plan, targets, |outcome| {
            if text_verbose {
                print_outcome(outcome);
            }
        });

        if self.json {
            print_json(&plan, &report)?;
        } else {
            println!();
            print_summary(&report, plan.dry_run);
        }

        if self.strict && report.has_failures() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    /// Resolve flags, environment and settings into a plan.
    fn plan(&self) -> Result<DistributionPlan> {
        let settings = match config::load() {
            Ok(settings) => settings,
            Err(ConfigError::HomeNotFound) => Settings::default(),
            Err(err) => return Err(err).context("failed to load settings"),
        };

        let source_dir = config::resolve_source(
            self.source.as_deref(),
            &settings,
            &config::installation_candidates(),
        )
        .context("cannot resolve the source template directory")?;

        let search_root = config::resolve_search_root(self.search_root.as_deref(), &settings);
        if !search_root.is_dir() {
            bail!("search root '{}' is not a directory", search_root.display());
        }

        Ok(DistributionPlan {
            source_dir,
            search_root,
            dry_run: self.dry_run,
        })
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "status")]
    status: &'static str,
    #[tabled(rename = "count")]
    count: usize,
}

fn print_outcome(outcome: &CopyOutcome) {
    println!(
        "  {}: {}",
        outcome.project().root_path().display(),
        status_indicator(outcome.kind())
    );
    if let Some(message) = outcome.error_message() {
        println!("    {}", message.red());
    }
    if outcome.is_success() && !outcome.files_copied().is_empty() {
        println!(
            "    {}",
            format!("Files: {}", outcome.files_copied().len()).dimmed()
        );
    }
}

fn print_summary(report: &DistributionReport, dry_run: bool) {
    println!("{}", "Distribution Summary".bold());
    let mut table = Table::new(summary_rows(&report.counts()));
    table.with(Style::rounded());
    println!("{table}");

    let line = if dry_run {
        format!(
            "Would update {}/{} projects.",
            report.succeeded(),
            report.total()
        )
        .cyan()
    } else {
        format!("Updated {}/{} projects.", report.succeeded(), report.total()).green()
    };
    println!();
    println!("{line}");
}

fn summary_rows(counts: &BTreeMap<StatusKind, usize>) -> Vec<SummaryRow> {
    StatusKind::ALL
        .into_iter()
        .filter_map(|kind| {
            counts.get(&kind).map(|&count| SummaryRow {
                status: kind.as_str(),
                count,
            })
        })
        .collect()
}

fn status_label(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Success => "✓ SUCCESS",
        StatusKind::DryRun => "○ DRY RUN",
        StatusKind::SkippedSelf => "- SKIPPED (self)",
        StatusKind::PermissionDenied => "✗ PERMISSION DENIED",
        StatusKind::Error => "✗ ERROR",
    }
}

fn status_indicator(kind: StatusKind) -> String {
    let label = status_label(kind);
    match kind {
        StatusKind::Success => label.green().to_string(),
        StatusKind::DryRun => label.cyan().to_string(),
        StatusKind::SkippedSelf => label.dimmed().to_string(),
        StatusKind::PermissionDenied | StatusKind::Error => label.red().to_string(),
    }
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson<'a> {
    dry_run: bool,
    source: &'a Path,
    search_root: &'a Path,
    excluded_self: usize,
    summary: BTreeMap<StatusKind, usize>,
    projects: Vec<ProjectJson<'a>>,
}

#[derive(Serialize)]
struct ProjectJson<'a> {
    root: &'a Path,
    status: StatusKind,
    files: &'a [PathBuf],
    error: Option<&'a str>,
}

fn print_json(plan: &DistributionPlan, report: &DistributionReport) -> Result<()> {
    let payload = ReportJson {
        dry_run: plan.dry_run,
        source: &plan.source_dir,
        search_root: &plan.search_root,
        excluded_self: report.excluded_self,
        summary: report.counts(),
        projects: report
            .outcomes
            .iter()
            .map(|outcome| ProjectJson {
                root: outcome.project().root_path(),
                status: outcome.kind(),
                files: outcome.files_copied(),
                error: outcome.error_message(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize report JSON")?
    );
    Ok(())
}
