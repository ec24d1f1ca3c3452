//! # cicd-sync
//!
//! Template mirroring and distribution orchestration.
//!
//! Call [`copy_templates`] to mirror a template directory into one
//! discovered project, or [`pipeline::run`] to discover targets and process
//! each of them in turn.

pub mod copier;
pub mod error;
pub mod pipeline;

pub use copier::{collect_files, copy_templates, FilesystemCopier};
pub use error::SyncError;
pub use pipeline::{DistributionPlan, DistributionReport, Targets};
