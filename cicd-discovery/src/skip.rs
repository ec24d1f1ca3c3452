//! Directory pruning rules for discovery.
//!
//! The skip table is data, not control flow: every rule is either an exact
//! name or a name suffix. Hidden directories are pruned separately, except
//! the template directory itself.

use cicd_core::layout::TEMPLATE_DIR_NAME;

/// A single pruning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipRule {
    /// Name equals the pattern.
    Exact(&'static str),
    /// Name ends with the pattern (`*.egg-info`).
    Suffix(&'static str),
}

impl SkipRule {
    pub fn matches(self, name: &str) -> bool {
        match self {
            SkipRule::Exact(pattern) => name == pattern,
            SkipRule::Suffix(pattern) => name.ends_with(pattern),
        }
    }
}

/// Version control, dependency trees, virtualenvs, tool caches, build output.
pub const SKIP_RULES: &[SkipRule] = &[
    // version control
    SkipRule::Exact(".git"),
    SkipRule::Exact(".hg"),
    SkipRule::Exact(".svn"),
    SkipRule::Exact("CVS"),
    // dependency trees and environments
    SkipRule::Exact("node_modules"),
    SkipRule::Exact(".venv"),
    SkipRule::Exact("venv"),
    SkipRule::Exact(".env"),
    SkipRule::Exact("env"),
    SkipRule::Exact("site-packages"),
    SkipRule::Exact(".eggs"),
    SkipRule::Suffix(".egg-info"),
    // tool caches
    SkipRule::Exact("__pycache__"),
    SkipRule::Exact(".tox"),
    SkipRule::Exact(".nox"),
    SkipRule::Exact(".pytest_cache"),
    SkipRule::Exact(".mypy_cache"),
    SkipRule::Exact(".ruff_cache"),
    SkipRule::Exact(".cache"),
    // build output
    SkipRule::Exact("dist"),
    SkipRule::Exact("build"),
];

/// True when `name` matches any rule in [`SKIP_RULES`].
pub fn is_skipped(name: &str) -> bool {
    SKIP_RULES.iter().any(|rule| rule.matches(name))
}

/// True for dot-directories other than the template directory.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != TEMPLATE_DIR_NAME
}

/// Whether the walker may enter a subdirectory called `name`.
pub fn should_enter(name: &str) -> bool {
    !is_skipped(name) && !is_hidden(name)
}
