//! Batch file rewriting
//!
//! Walks a directory tree, applies a [`RuleSet`] to every file a rule
//! targets and writes changed files back. Each file is handled on its own:
//! a failure is logged, counted and the walk moves on. Writes go to a
//! sibling temporary file that is renamed over the original, so a file is
//! either fully rewritten or untouched.

use super::rules::RuleSet;
use crate::{error, LinguaError, Result, BACKUP_SUFFIX};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Contents changed; names of the rules that fired
    Rewritten(Vec<String>),
    /// No rule's guard matched
    Unchanged,
    /// Not processed, with the reason
    Skipped(String),
}

/// Aggregate result of a run
#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub rewritten: Vec<PathBuf>,
    pub unchanged: usize,
    pub skipped: Vec<(PathBuf, String)>,
    pub failed: Vec<(PathBuf, String)>,
    /// How many files each rule changed
    pub applied: BTreeMap<String, usize>,
}

impl RewriteReport {
    fn new(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            dry_run,
            rewritten: Vec::new(),
            unchanged: 0,
            skipped: Vec::new(),
            failed: Vec::new(),
            applied: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.rewritten.len() + self.unchanged + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// One-line summary for the terminal
    pub fn summary(&self) -> String {
        let elapsed = (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default();
        format!(
            "{}{} file(s) scanned in {}: {} rewritten, {} unchanged, {} skipped, {} failed",
            if self.dry_run { "[dry run] " } else { "" },
            self.total(),
            humantime::format_duration(std::time::Duration::from_millis(elapsed.as_millis() as u64)),
            self.rewritten.len(),
            self.unchanged,
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Applies a rule set below a root directory
#[derive(Debug)]
pub struct Rewriter {
    root: PathBuf,
    rules: RuleSet,
    dry_run: bool,
    backup: bool,
    show_progress: bool,
}

impl Rewriter {
    pub fn new(root: impl Into<PathBuf>, rules: RuleSet) -> Self {
        Self {
            root: root.into(),
            rules,
            dry_run: false,
            backup: false,
            show_progress: false,
        }
    }

    /// Compute the report without writing anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Copy each file to `<file>.backup` before its first rewrite
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Files below the root targeted by at least one rule, sorted
    pub fn candidates(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(LinguaError::RewriteError(format!(
                "Root is not a directory: {}",
                self.root.display()
            )));
        }

        let escaped_root = glob::Pattern::escape(&self.root.to_string_lossy());
        let mut found = BTreeSet::new();
        for rule in self.rules.rules() {
            let pattern = format!("{}/{}", escaped_root, rule.files_pattern());
            let entries = glob::glob(&pattern)?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() && !is_backup(&path) => {
                        found.insert(path);
                    }
                    Ok(_) => {}
                    Err(err) => warn!(path = %err.path().display(), error = %err.error(), "unreadable path"),
                }
            }
        }
        Ok(found.into_iter().collect())
    }

    /// Rewrite every candidate file
    pub fn run(&self) -> Result<RewriteReport> {
        let mut report = RewriteReport::new(self.dry_run);
        let files = self.candidates()?;
        info!(root = %self.root.display(), files = files.len(), dry_run = self.dry_run, "rewrite started");

        let progress = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{spinner} {pos}/{len} {wide_msg}") {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        for path in files {
            progress.set_message(path.display().to_string());
            match self.rewrite_file(&path) {
                Ok(FileOutcome::Rewritten(rules)) => {
                    info!(path = %path.display(), rules = ?rules, "rewritten");
                    for rule in rules {
                        *report.applied.entry(rule).or_default() += 1;
                    }
                    report.rewritten.push(path);
                }
                Ok(FileOutcome::Unchanged) => {
                    debug!(path = %path.display(), "unchanged");
                    report.unchanged += 1;
                }
                Ok(FileOutcome::Skipped(reason)) => {
                    warn!(path = %path.display(), %reason, "skipped");
                    report.skipped.push((path, reason));
                }
                Err(err) if !error::is_per_file_error(&err) => {
                    progress.abandon();
                    return Err(err);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "rewrite failed");
                    report.failed.push((path, err.to_string()));
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        report.finished_at = Utc::now();
        info!("{}", report.summary());
        Ok(report)
    }

    /// Apply the rules to one file
    pub fn rewrite_file(&self, path: &Path) -> Result<FileOutcome> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => return Ok(FileOutcome::Skipped("not valid UTF-8".to_string())),
        };

        let Some((rewritten, applied)) = self.rules.apply(relative, &text) else {
            return Ok(FileOutcome::Unchanged);
        };

        if !self.dry_run {
            if self.backup {
                write_backup(path)?;
            }
            replace_contents(path, &rewritten)?;
        }
        Ok(FileOutcome::Rewritten(applied))
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn is_backup(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == BACKUP_SUFFIX)
}

/// Keep the first backup; later runs must not overwrite the original copy
fn write_backup(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    if backup.exists() {
        debug!(backup = %backup.display(), "backup already present");
        return Ok(());
    }
    fs::copy(path, &backup).map_err(|e| {
        LinguaError::RewriteError(format!("Failed to back up {}: {}", path.display(), e))
    })?;
    Ok(())
}

/// Write `contents` next to `path` and rename it into place
fn replace_contents(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.linguaflow-tmp", file_name));

    let written = fs::write(&tmp, contents)
        .and_then(|_| {
            let permissions = fs::metadata(path)?.permissions();
            fs::set_permissions(&tmp, permissions)
        })
        .and_then(|_| fs::rename(&tmp, path));

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(LinguaError::RewriteError(format!(
            "Failed to write {}: {}",
            path.display(),
            err
        )));
    }
    Ok(())
}
