//! cicd-public core library: domain types, layout constants, ports, config.
//!
//! Public API surface:
//! - [`types`]: [`DiscoveredProject`], [`CopyOutcome`], [`CopyStatus`]
//! - [`layout`]: fixed template directory and marker file names
//! - [`ports`]: the discovery and copy seams driven by the pipeline
//! - [`config`]: settings file and source/search-root resolution
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod layout;
pub mod ports;
pub mod types;

pub use error::ConfigError;
pub use ports::{CopyTemplates, DiscoverProjects};
pub use types::{CopyOutcome, CopyStatus, DiscoveredProject, StatusKind};
