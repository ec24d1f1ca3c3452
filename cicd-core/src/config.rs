//! Settings file and run-input resolution.
//!
//! # Storage layout
//!
//! ```text
//! ~/.cicd-public/
//!   config.yaml   (optional; every key optional)
//! ```
//!
//! # API pattern
//!
//! Functions touching the home directory come in two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, ConfigError};
use crate::layout;

pub const CONFIG_DIR_NAME: &str = ".cicd-public";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable consulted for the source template directory.
pub const SOURCE_ENV: &str = "CICD_PUBLIC_SOURCE";
/// Environment variable consulted for the search root.
pub const SEARCH_ROOT_ENV: &str = "CICD_PUBLIC_SEARCH_ROOT";

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// Persistent defaults read from `~/.cicd-public/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Source `.github/` directory to distribute.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Directory discovery starts from.
    #[serde(default)]
    pub search_root: Option<PathBuf>,
}

/// `<home>/.cicd-public/config.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Load settings under `home`. A missing or empty file yields defaults.
pub fn load_at(home: &Path) -> Result<Settings, ConfigError> {
    let path = settings_path_at(home);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(io_err(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, ConfigError> {
    load_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Search root
// ---------------------------------------------------------------------------

/// Filesystem root of the current platform.
pub fn default_search_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}

/// Explicit value, then settings, then the platform root.
pub fn resolve_search_root(explicit: Option<&Path>, settings: &Settings) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| settings.search_root.clone())
        .unwrap_or_else(default_search_root)
}

// ---------------------------------------------------------------------------
// Source template directory
// ---------------------------------------------------------------------------

/// Resolve the source `.github/` directory.
///
/// An explicit value wins over settings; either must exist. Without both,
/// the first installation candidate holding the marker workflow is used.
/// The result is canonicalized.
pub fn resolve_source(
    explicit: Option<&Path>,
    settings: &Settings,
    installation_candidates: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.or(settings.source.as_deref()) {
        if !path.is_dir() {
            return Err(ConfigError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        return path.canonicalize().map_err(|e| io_err(path, e));
    }

    installation_candidates
        .iter()
        .find(|dir| holds_marker(dir))
        .map(|dir| dir.canonicalize().map_err(|e| io_err(dir, e)))
        .unwrap_or_else(|| {
            Err(ConfigError::NoDefaultSource {
                dir: layout::TEMPLATE_DIR_NAME,
            })
        })
}

/// Template directories the tool may have been installed next to.
///
/// Walks up from the running executable, then falls back to the checkout the
/// binary was built from.
pub fn installation_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.extend(exe_dir.ancestors().map(layout::template_dir_of));
    }
    if let Some(workspace) = Path::new(env!("CARGO_MANIFEST_DIR")).parent() {
        candidates.push(layout::template_dir_of(workspace));
    }
    candidates
}

fn holds_marker(template_dir: &Path) -> bool {
    template_dir
        .join(layout::WORKFLOWS_DIR_NAME)
        .join(layout::MARKER_FILE_NAME)
        .is_file()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
