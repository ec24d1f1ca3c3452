//! Domain types shared by discovery, synchronization and reporting.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::layout;

// ---------------------------------------------------------------------------
// DiscoveredProject
// ---------------------------------------------------------------------------

/// A project found by discovery: a directory carrying the marker workflow.
///
/// Immutable once constructed; the template directory is always derived from
/// the root so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredProject {
    root_path: PathBuf,
    template_dir: PathBuf,
}

impl DiscoveredProject {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let template_dir = layout::template_dir_of(&root_path);
        Self {
            root_path,
            template_dir,
        }
    }

    /// Project root directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// `<root>/.github`: destination of every synchronized file.
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// `<root>/.github/workflows/default_cicd_public.yml`
    pub fn marker_file(&self) -> PathBuf {
        self.template_dir
            .join(layout::WORKFLOWS_DIR_NAME)
            .join(layout::MARKER_FILE_NAME)
    }
}

impl fmt::Display for DiscoveredProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root_path.display(), f)
    }
}

// ---------------------------------------------------------------------------
// Copy status
// ---------------------------------------------------------------------------

/// Result of one synchronization attempt, one variant per status.
///
/// `files_copied` holds paths relative to the template directory, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyStatus {
    /// Every enumerated file was written.
    Success { files_copied: Vec<PathBuf> },
    /// Nothing was written; these files would have been.
    DryRun { files_copied: Vec<PathBuf> },
    /// The target is the tool's own template source.
    SkippedSelf,
    /// Writing stopped on an access-rights failure.
    PermissionDenied { message: String },
    /// Writing stopped on any other I/O failure.
    Error { message: String },
}

impl CopyStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            CopyStatus::Success { .. } => StatusKind::Success,
            CopyStatus::DryRun { .. } => StatusKind::DryRun,
            CopyStatus::SkippedSelf => StatusKind::SkippedSelf,
            CopyStatus::PermissionDenied { .. } => StatusKind::PermissionDenied,
            CopyStatus::Error { .. } => StatusKind::Error,
        }
    }
}

/// Payload-free mirror of [`CopyStatus`], used for tallies and labels.
///
/// Variant order is the order statuses appear in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    DryRun,
    SkippedSelf,
    PermissionDenied,
    Error,
}

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        StatusKind::Success,
        StatusKind::DryRun,
        StatusKind::SkippedSelf,
        StatusKind::PermissionDenied,
        StatusKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::DryRun => "dry_run",
            StatusKind::SkippedSelf => "skipped_self",
            StatusKind::PermissionDenied => "permission_denied",
            StatusKind::Error => "error",
        }
    }

    /// Success or dry run.
    pub fn is_success(self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::DryRun)
    }

    /// Permission denied or generic error.
    pub fn is_failure(self) -> bool {
        matches!(self, StatusKind::PermissionDenied | StatusKind::Error)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CopyOutcome
// ---------------------------------------------------------------------------

/// Outcome of synchronizing one target project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    project: DiscoveredProject,
    status: CopyStatus,
}

impl CopyOutcome {
    pub fn new(project: DiscoveredProject, status: CopyStatus) -> Self {
        Self { project, status }
    }

    /// Outcome a caller assigns to its own template source without
    /// invoking the synchronizer.
    pub fn skipped_self(project: DiscoveredProject) -> Self {
        Self::new(project, CopyStatus::SkippedSelf)
    }

    pub fn project(&self) -> &DiscoveredProject {
        &self.project
    }

    pub fn status(&self) -> &CopyStatus {
        &self.status
    }

    pub fn kind(&self) -> StatusKind {
        self.status.kind()
    }

    pub fn is_success(&self) -> bool {
        self.kind().is_success()
    }

    /// Files written (or that would be written); empty for every other status.
    pub fn files_copied(&self) -> &[PathBuf] {
        match &self.status {
            CopyStatus::Success { files_copied } | CopyStatus::DryRun { files_copied } => {
                files_copied
            }
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            CopyStatus::PermissionDenied { message } | CopyStatus::Error { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> DiscoveredProject {
        DiscoveredProject::new("/code/app")
    }

    #[test]
    fn template_dir_and_marker_derive_from_root() {
        let p = project();
        assert_eq!(p.template_dir(), Path::new("/code/app/.github"));
        assert_eq!(
            p.marker_file(),
            PathBuf::from("/code/app/.github/workflows/default_cicd_public.yml")
        );
    }

    #[test]
    fn payload_accessors_follow_status() {
        let files = vec![PathBuf::from("dependabot.yml")];
        let ok = CopyOutcome::new(
            project(),
            CopyStatus::Success {
                files_copied: files.clone(),
            },
        );
        assert_eq!(ok.files_copied(), files.as_slice());
        assert!(ok.error_message().is_none());
        assert!(ok.is_success());

        let denied = CopyOutcome::new(
            project(),
            CopyStatus::PermissionDenied {
                message: "denied".to_string(),
            },
        );
        assert!(denied.files_copied().is_empty());
        assert_eq!(denied.error_message(), Some("denied"));
        assert!(!denied.is_success());
        assert!(denied.kind().is_failure());
    }

    #[test]
    fn skipped_self_is_neither_success_nor_failure() {
        let outcome = CopyOutcome::skipped_self(project());
        assert_eq!(outcome.kind(), StatusKind::SkippedSelf);
        assert!(!outcome.kind().is_success());
        assert!(!outcome.kind().is_failure());
        assert!(outcome.files_copied().is_empty());
    }

    #[test]
    fn status_kind_order_matches_all() {
        let mut sorted = StatusKind::ALL;
        sorted.sort();
        assert_eq!(sorted, StatusKind::ALL);
    }
}
