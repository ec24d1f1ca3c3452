//! Fixed on-disk layout shared by discovery and synchronization.
//!
//! ```text
//! <project root>/
//!   .github/                     TEMPLATE_DIR_NAME
//!     workflows/                 WORKFLOWS_DIR_NAME
//!       default_cicd_public.yml  MARKER_FILE_NAME
//! ```

use std::path::{Path, PathBuf};

/// Hidden directory at each project root that holds the synchronized files.
pub const TEMPLATE_DIR_NAME: &str = ".github";

pub const WORKFLOWS_DIR_NAME: &str = "workflows";

/// Workflow whose presence opts a project into template distribution.
pub const MARKER_FILE_NAME: &str = "default_cicd_public.yml";

/// `.github/workflows/default_cicd_public.yml`: relative to a project root.
pub fn marker_relative_path() -> PathBuf {
    Path::new(TEMPLATE_DIR_NAME)
        .join(WORKFLOWS_DIR_NAME)
        .join(MARKER_FILE_NAME)
}

/// `<root>/.github`: pure, no I/O.
pub fn template_dir_of(root: &Path) -> PathBuf {
    root.join(TEMPLATE_DIR_NAME)
}

/// `<root>/.github/workflows/default_cicd_public.yml`: pure, no I/O.
pub fn marker_path_of(root: &Path) -> PathBuf {
    root.join(marker_relative_path())
}
