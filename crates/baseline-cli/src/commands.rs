//! Command implementations for compare-baselines.
//!
//! Handles:
//! - cpu: compare CPU models within one baseline directory
//! - directory: compare two baseline directories
//! - commit: compare the baselines of two git revisions
//! - latest: compare the working tree against HEAD
//! - history: collect one configuration's targets across revisions

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use baseline_compare::{
    ComparisonReport, ComparisonRequest, CpuComparator, SourceComparator, TrendCollector,
    TrendQuery,
};
use baseline_parser::BaselineDirectory;
use baseline_types::Settings;

use crate::cli::{FilterArgs, HistoryArgs};
use crate::worktree::GitWorktree;

/// Default path of the history file.
pub const DEFAULT_HISTORY_OUTPUT: &str = "baseline_history.json";

/// Load configuration (defaults -> file -> env) and apply the log level flag.
pub fn load_settings(config_path: Option<&str>, log_level_override: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Build the comparison request, falling back to configured selections.
fn build_request(settings: &Settings, filters: &FilterArgs) -> Result<ComparisonRequest> {
    let request = ComparisonRequest::new(
        or_configured(&filters.tests, &settings.tests),
        or_configured(&filters.kernels, &settings.kernels),
        or_configured(&filters.codenames, &settings.codenames),
    )
    .context("Invalid comparison request")?;
    Ok(request.with_auxiliary(filters.auxiliary))
}

fn or_configured<T: Clone>(flags: &[T], configured: &[T]) -> Vec<T> {
    if flags.is_empty() {
        configured.to_vec()
    } else {
        flags.to_vec()
    }
}

fn output_path(settings: &Settings, filters: &FilterArgs) -> PathBuf {
    PathBuf::from(filters.output.as_deref().unwrap_or(&settings.output))
}

fn open_directory(path: &Path) -> Result<BaselineDirectory> {
    BaselineDirectory::open(path)
        .with_context(|| format!("Failed to open baseline directory {}", path.display()))
}

/// Write `contents` to `path` atomically: a temporary file in the same
/// directory is renamed over the destination.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut file = NamedTempFile::new_in(parent).context("Failed to create temporary file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write report")?;
    file.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn finish(report: &ComparisonReport, output: &Path) -> Result<PathBuf> {
    let json = report
        .to_json_pretty()
        .context("Failed to serialize report")?;
    write_report(output, &json)?;
    info!(
        entries = report.entries().len(),
        "Wrote comparison report to {:?}", output
    );
    Ok(output.to_path_buf())
}

/// `cpu`: every codename against the first one, within one directory.
pub fn compare_cpu_models(
    settings: &Settings,
    directory: Option<&str>,
    filters: &FilterArgs,
) -> Result<PathBuf> {
    let request = build_request(settings, filters)?;
    let root = directory
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.repository_baseline_directory());
    let directory = open_directory(&root)?;

    let report = CpuComparator::new(&directory)
        .compare(&request)
        .context("CPU comparison failed")?;
    finish(&report, &output_path(settings, filters))
}

/// `directory`: the target directory against the source directory.
pub fn compare_directories(
    settings: &Settings,
    source: &str,
    target: &str,
    filters: &FilterArgs,
) -> Result<PathBuf> {
    let request = build_request(settings, filters)?;
    let source = open_directory(Path::new(source))?;
    let target = open_directory(Path::new(target))?;

    let report = SourceComparator::new(&source, &target)
        .compare(&request)
        .context("Directory comparison failed")?;
    finish(&report, &output_path(settings, filters))
}

/// `commit`: the baselines of `target` against those of `source`.
pub fn compare_commits(
    settings: &Settings,
    source: &str,
    target: &str,
    directory: Option<&str>,
    repo: Option<&str>,
    filters: &FilterArgs,
) -> Result<PathBuf> {
    let request = build_request(settings, filters)?;
    let repo = repo.unwrap_or(&settings.repository);
    let baseline_directory = directory.unwrap_or(&settings.baseline_directory);

    let source_tree = GitWorktree::checkout(repo, source)
        .with_context(|| format!("Failed to check out {source}"))?;
    let target_tree = GitWorktree::checkout(repo, target)
        .with_context(|| format!("Failed to check out {target}"))?;
    let source_dir = open_directory(&source_tree.path().join(baseline_directory))?;
    let target_dir = open_directory(&target_tree.path().join(baseline_directory))?;

    let report = SourceComparator::new(&source_dir, &target_dir)
        .with_labels(source, target)
        .compare(&request)
        .context("Revision comparison failed")?;
    finish(&report, &output_path(settings, filters))
}

/// `latest`: the working tree baselines against those committed at HEAD.
pub fn compare_latest(
    settings: &Settings,
    directory: Option<&str>,
    repo: Option<&str>,
    filters: &FilterArgs,
) -> Result<PathBuf> {
    let request = build_request(settings, filters)?;
    let repo = repo.unwrap_or(&settings.repository);
    let baseline_directory = directory.unwrap_or(&settings.baseline_directory);

    let head = GitWorktree::checkout(repo, "HEAD").context("Failed to check out HEAD")?;
    let committed = open_directory(&head.path().join(baseline_directory))?;
    let working = open_directory(&Path::new(repo).join(baseline_directory))?;

    let report = SourceComparator::new(&committed, &working)
        .with_labels("HEAD", "working tree")
        .compare(&request)
        .context("Working tree comparison failed")?;
    finish(&report, &output_path(settings, filters))
}

/// `history`: targets of one configuration, revision by revision.
pub fn show_history(settings: &Settings, args: &HistoryArgs) -> Result<PathBuf> {
    let mut query = TrendQuery::new(
        args.test,
        args.host_kernel,
        args.codename,
        args.guest_kernel.unwrap_or(args.host_kernel),
    )
    .with_guest_os(args.guest_os)
    .with_machine_config(args.machine_config);
    if let Some(direction) = args.direction {
        query = query.with_direction(direction);
    }
    if !args.metrics.is_empty() {
        query = query.with_metrics(args.metrics.clone());
    }
    let mut collector = TrendCollector::new(query).context("Invalid history query")?;

    let repo = args.repo.as_deref().unwrap_or(&settings.repository);
    let baseline_directory = args
        .directory
        .as_deref()
        .unwrap_or(&settings.baseline_directory);

    for revision in &args.revisions {
        let worktree = GitWorktree::checkout(repo, revision)
            .with_context(|| format!("Failed to check out {revision}"))?;
        let root = worktree.path().join(baseline_directory);
        let document = if root.is_dir() {
            open_directory(&root)?
                .load(args.test, args.host_kernel)
                .with_context(|| format!("Failed to load baselines of {revision}"))?
        } else {
            None
        };
        collector.record(revision.as_str(), document.as_ref());
    }

    let report = collector.finish();
    let output = PathBuf::from(args.output.as_deref().unwrap_or(DEFAULT_HISTORY_OUTPUT));
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize history")?;
    write_report(&output, &json)?;
    info!(
        revisions = report.points.len(),
        found = report.found().count(),
        "Wrote baseline history to {:?}", output
    );
    Ok(output)
}
