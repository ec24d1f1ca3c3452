//! Marker-driven project discovery for `cicd-discovery`.
//!
//! `discover(root)` walks a directory tree depth-first, pre-order, and yields
//! every directory holding `.github/workflows/default_cicd_public.yml`. The
//! walk is lazy: each directory is listed only when the consumer asks for the
//! next project, and the walker keeps its own frame stack instead of
//! recursing.
//!
//! Symlinked directories are followed. Each directory is visited at most
//! once, keyed by its canonical path, so link cycles terminate and a project
//! reachable through several links is reported under the first path the walk
//! reaches it by.
//!
//! Traversal never fails. A directory that cannot be listed counts as empty,
//! a marker that cannot be inspected counts as absent, and both are logged at
//! `debug` level.

pub mod skip;

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;

use cicd_core::{layout, DiscoverProjects, DiscoveredProject};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lazily discover marker-bearing projects under `search_root`.
///
/// Subdirectories are visited in file-name order, so results are
/// deterministic for a given tree.
pub fn discover(search_root: &Path) -> Discover {
    Discover {
        root: Some(search_root.to_path_buf()),
        stack: Vec::new(),
        visited: HashSet::new(),
    }
}

/// Production [`DiscoverProjects`] backed by [`discover`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemDiscovery;

impl DiscoverProjects for FilesystemDiscovery {
    fn discover<'a>(
        &'a self,
        search_root: &Path,
    ) -> Box<dyn Iterator<Item = DiscoveredProject> + 'a> {
        Box::new(discover(search_root))
    }
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Single-pass iterator returned by [`discover`].
#[derive(Debug)]
pub struct Discover {
    /// Search root, until the first call to `next`.
    root: Option<PathBuf>,
    /// One frame per directory on the current path, holding the
    /// subdirectories not yet visited.
    stack: Vec<vec::IntoIter<PathBuf>>,
    /// Canonical paths of every directory visited so far.
    visited: HashSet<PathBuf>,
}

impl Iterator for Discover {
    type Item = DiscoveredProject;

    fn next(&mut self) -> Option<DiscoveredProject> {
        if let Some(root) = self.root.take() {
            if let Some(project) = self.visit(root, true) {
                return Some(project);
            }
        }

        loop {
            let dir = match self.stack.last_mut()?.next() {
                Some(dir) => dir,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            let descend = !is_template_dir(&dir);
            if let Some(project) = self.visit(dir, descend) {
                return Some(project);
            }
        }
    }
}

impl Discover {
    /// Inspect `dir` and push its children as a new frame.
    ///
    /// `descend` is false for template directories: they are checked like
    /// any other directory but their subdirectories are never walked.
    fn visit(&mut self, dir: PathBuf, descend: bool) -> Option<DiscoveredProject> {
        let key = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
        if !self.visited.insert(key) {
            tracing::debug!("already visited {}", dir.display());
            return None;
        }

        let children = match list_subdirs(&dir) {
            Ok(children) => children,
            Err(err) => {
                tracing::debug!("skipping unreadable {}: {}", dir.display(), err);
                return None;
            }
        };

        let found = has_marker(&dir);
        if descend {
            self.stack.push(children.into_iter());
        }

        if found {
            tracing::debug!("found marker in {}", dir.display());
            Some(DiscoveredProject::new(dir))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Subdirectories of `dir` the walker may enter, sorted by name.
///
/// Entries that cannot be read or typed are dropped individually. Symlinks
/// count when they resolve to a directory; dangling ones are dropped.
fn list_subdirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(is_dir_entry)
        .filter(|e| skip::should_enter(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect();
    children.sort();
    Ok(children)
}

fn is_dir_entry(entry: &fs::DirEntry) -> bool {
    match entry.file_type() {
        Ok(t) if t.is_dir() => true,
        Ok(t) if t.is_symlink() => fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false),
        _ => false,
    }
}

fn has_marker(dir: &Path) -> bool {
    let marker = layout::marker_path_of(dir);
    match fs::metadata(&marker) {
        Ok(meta) => meta.is_file(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => {
            tracing::debug!("cannot inspect {}: {}", marker.display(), err);
            false
        }
    }
}

fn is_template_dir(dir: &Path) -> bool {
    dir.file_name()
        .map(|name| name == layout::TEMPLATE_DIR_NAME)
        .unwrap_or(false)
}
