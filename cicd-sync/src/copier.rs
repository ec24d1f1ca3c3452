//! Template mirroring for a single target project.
//!
//! ## `copy_templates` protocol
//!
//! 1. Enumerate every regular file under the source, relative, sorted.
//! 2. Dry run: report the enumeration and stop.
//! 3. For each file: create parent directories, copy bytes over any existing
//!    destination, carry over access and modification times.
//! 4. The first failure aborts the target. Files already written stay on
//!    disk; the outcome reports none of them.
//!
//! A target whose template directory, or any destination file, resolves to
//! the source (through a symlink, say) is refused before anything is
//! written: copying a file onto itself truncates it.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use cicd_core::{CopyOutcome, CopyStatus, CopyTemplates, DiscoveredProject};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Every regular file under `source_dir`, relative to it, lexicographically
/// sorted.
///
/// Symlinks to files are included; symlinks to directories are not walked.
pub fn collect_files(source_dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut files = Vec::new();
    let mut pending = vec![source_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
                let relative = path
                    .strip_prefix(source_dir)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
                files.push(relative);
            }
        }
    }

    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// copy_templates
// ---------------------------------------------------------------------------

/// Mirror `source_dir` into `target`'s template directory.
///
/// Never fails: errors become [`CopyStatus::PermissionDenied`] or
/// [`CopyStatus::Error`] on the returned outcome.
pub fn copy_templates(source_dir: &Path, target: &DiscoveredProject, dry_run: bool) -> CopyOutcome {
    let files = match collect_files(source_dir) {
        Ok(files) => files,
        Err(err) => {
            tracing::warn!("cannot enumerate {}: {}", source_dir.display(), err);
            return failure(target, &err);
        }
    };

    if dry_run {
        for relative in &files {
            tracing::info!(
                "[dry-run] would copy: {}",
                target.template_dir().join(relative).display()
            );
        }
        return CopyOutcome::new(
            target.clone(),
            CopyStatus::DryRun {
                files_copied: files,
            },
        );
    }

    if let Err(err) = ensure_distinct(source_dir, target.template_dir()) {
        tracing::warn!("skipping {}: {}", target, err);
        return failure(target, &err);
    }

    let mut copied = Vec::with_capacity(files.len());
    for relative in &files {
        let from = source_dir.join(relative);
        let to = target.template_dir().join(relative);
        if let Err(err) = copy_file(&from, &to) {
            tracing::warn!(
                "aborting {} after {} of {} file(s): {}",
                target,
                copied.len(),
                files.len(),
                err
            );
            return failure(target, &err);
        }
        tracing::info!("copied: {}", to.display());
        copied.push(relative.clone());
    }

    copied.sort();
    CopyOutcome::new(
        target.clone(),
        CopyStatus::Success {
            files_copied: copied,
        },
    )
}

/// Production [`CopyTemplates`] backed by [`copy_templates`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemCopier;

impl CopyTemplates for FilesystemCopier {
    fn copy_templates(
        &self,
        source_dir: &Path,
        target: &DiscoveredProject,
        dry_run: bool,
    ) -> CopyOutcome {
        copy_templates(source_dir, target, dry_run)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn failure(target: &DiscoveredProject, err: &SyncError) -> CopyOutcome {
    let message = err.to_string();
    let status = if err.is_permission_denied() {
        CopyStatus::PermissionDenied { message }
    } else {
        CopyStatus::Error { message }
    };
    CopyOutcome::new(target.clone(), status)
}

/// Copy one file, creating parents and overwriting the destination.
///
/// Timestamps are carried over where the platform allows; failing to set
/// them does not fail the copy.
fn copy_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    ensure_distinct(from, to)?;

    fs::copy(from, to).map_err(|source| SyncError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    if let Err(err) = preserve_times(from, to) {
        tracing::debug!("timestamps not preserved for {}: {}", to.display(), err);
    }
    Ok(())
}

/// Fail when `dest` already exists and resolves to the same path as
/// `source`. A destination that does not exist yet cannot alias anything.
fn ensure_distinct(source: &Path, dest: &Path) -> Result<(), SyncError> {
    let Ok(dest_real) = fs::canonicalize(dest) else {
        return Ok(());
    };
    let source_real = fs::canonicalize(source).map_err(|e| io_err(source, e))?;
    if dest_real == source_real {
        return Err(SyncError::SameAsSource {
            path: dest.to_path_buf(),
            source_dir: source_real,
        });
    }
    Ok(())
}

fn preserve_times(from: &Path, to: &Path) -> std::io::Result<()> {
    let meta = fs::metadata(from)?;
    filetime::set_file_times(
        to,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
