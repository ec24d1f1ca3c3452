//! Seams between the distribution pipeline and the filesystem.
//!
//! Production implementations live in `cicd-discovery` and `cicd-sync`;
//! tests substitute their own.

use std::path::Path;

use crate::types::{CopyOutcome, DiscoveredProject};

/// Finds projects carrying the marker workflow under a search root.
pub trait DiscoverProjects {
    /// Lazily walk `search_root`. Traversal failures are absorbed, never
    /// returned.
    fn discover<'a>(
        &'a self,
        search_root: &Path,
    ) -> Box<dyn Iterator<Item = DiscoveredProject> + 'a>;
}

/// Mirrors a template directory into one target project.
pub trait CopyTemplates {
    /// Failures are reported through the outcome's status, never returned.
    fn copy_templates(
        &self,
        source_dir: &Path,
        target: &DiscoveredProject,
        dry_run: bool,
    ) -> CopyOutcome;
}
