//! Distribution pipeline shared by every entrypoint.
//!
//! Discovery runs once and is drained into a list; the project owning the
//! source template directory is removed; every remaining target is then
//! synchronized strictly one after another.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cicd_core::{CopyOutcome, CopyTemplates, DiscoverProjects, DiscoveredProject, StatusKind};

/// Inputs of one distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
    /// Source `.github/` directory.
    pub source_dir: PathBuf,
    /// Directory discovery starts from.
    pub search_root: PathBuf,
    pub dry_run: bool,
}

impl DistributionPlan {
    /// Root of the project the templates come from: the source's parent.
    pub fn source_project_root(&self) -> Option<PathBuf> {
        self.source_dir.parent().map(canonical)
    }

    /// True when `project` is the tool's own template source, either by
    /// root or because its template directory resolves to the source.
    pub fn is_self(&self, project: &DiscoveredProject) -> bool {
        let same_root = self
            .source_project_root()
            .is_some_and(|own| canonical(project.root_path()) == own);
        same_root || canonical(project.template_dir()) == canonical(&self.source_dir)
    }
}

/// Discovery result after self-exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub projects: Vec<DiscoveredProject>,
    /// Discovered projects dropped because they own the source.
    pub excluded_self: usize,
}

/// Outcomes of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    pub outcomes: Vec<CopyOutcome>,
    pub excluded_self: usize,
}

impl DistributionReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcome count per status, in summary order; absent statuses omitted.
    pub fn counts(&self) -> BTreeMap<StatusKind, usize> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Success plus dry run.
    pub fn succeeded(&self) -> usize {
        self.count_where(StatusKind::is_success)
    }

    /// Permission denied plus generic error.
    pub fn failed(&self) -> usize {
        self.count_where(StatusKind::is_failure)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count_where(&self, pred: fn(StatusKind) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o.kind())).count()
    }
}

/// Run discovery once and drop the source's own project.
pub fn collect_targets(discovery: &dyn DiscoverProjects, plan: &DistributionPlan) -> Targets {
    let mut targets = Targets::default();
    for project in discovery.discover(&plan.search_root) {
        if plan.is_self(&project) {
            tracing::debug!("excluding template source {}", project);
            targets.excluded_self += 1;
        } else {
            targets.projects.push(project);
        }
    }
    targets
}

/// Synchronize each target in order, reporting every outcome to
/// `on_outcome` as soon as it is known.
pub fn sync_targets(
    copier: &dyn CopyTemplates,
    plan: &DistributionPlan,
    targets: Targets,
    mut on_outcome: impl FnMut(&CopyOutcome),
) -> DistributionReport {
    let mut outcomes = Vec::with_capacity(targets.projects.len());
    for project in &targets.projects {
        let outcome = copier.copy_templates(&plan.source_dir, project, plan.dry_run);
        on_outcome(&outcome);
        outcomes.push(outcome);
    }
    DistributionReport {
        outcomes,
        excluded_self: targets.excluded_self,
    }
}

/// Discover, exclude self, synchronize.
pub fn run(
    discovery: &dyn DiscoverProjects,
    copier: &dyn CopyTemplates,
    plan: &DistributionPlan,
) -> DistributionReport {
    let targets = collect_targets(discovery, plan);
    sync_targets(copier, plan, targets, |_| {})
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use cicd_core::CopyStatus;

    use super::*;

    struct FixedDiscovery(Vec<PathBuf>);

    impl DiscoverProjects for FixedDiscovery {
        fn discover<'a>(
            &'a self,
            _search_root: &Path,
        ) -> Box<dyn Iterator<Item = DiscoveredProject> + 'a> {
            Box::new(self.0.iter().map(DiscoveredProject::new))
        }
    }

    /// Records every target it is handed; fails roots named `locked`.
    #[derive(Default)]
    struct RecordingCopier {
        seen: RefCell<Vec<PathBuf>>,
    }

    impl CopyTemplates for RecordingCopier {
        fn copy_templates(
            &self,
            _source_dir: &Path,
            target: &DiscoveredProject,
            dry_run: bool,
        ) -> CopyOutcome {
            self.seen.borrow_mut().push(target.root_path().to_path_buf());
            let files_copied = vec![PathBuf::from("workflows/default_cicd_public.yml")];
            let status = if target.root_path().ends_with("locked") {
                CopyStatus::PermissionDenied {
                    message: "denied".to_string(),
                }
            } else if dry_run {
                CopyStatus::DryRun { files_copied }
            } else {
                CopyStatus::Success { files_copied }
            };
            CopyOutcome::new(target.clone(), status)
        }
    }

    fn plan(dry_run: bool) -> DistributionPlan {
        DistributionPlan {
            source_dir: PathBuf::from("/nonexistent/source/.github"),
            search_root: PathBuf::from("/nonexistent"),
            dry_run,
        }
    }

    #[test]
    fn self_project_never_reaches_the_copier() {
        let discovery = FixedDiscovery(vec![
            PathBuf::from("/nonexistent/source"),
            PathBuf::from("/nonexistent/other"),
        ]);
        let copier = RecordingCopier::default();

        let report = run(&discovery, &copier, &plan(false));

        assert_eq!(
            copier.seen.borrow().as_slice(),
            [PathBuf::from("/nonexistent/other")]
        );
        assert_eq!(report.excluded_self, 1);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn empty_discovery_gives_empty_report() {
        let report = run(
            &FixedDiscovery(vec![]),
            &RecordingCopier::default(),
            &plan(true),
        );
        assert!(report.is_empty());
        assert!(report.counts().is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn counts_and_totals_follow_outcomes() {
        let discovery = FixedDiscovery(vec![
            PathBuf::from("/nonexistent/a"),
            PathBuf::from("/nonexistent/locked"),
            PathBuf::from("/nonexistent/b"),
        ]);
        let report = run(&discovery, &RecordingCopier::default(), &plan(false));

        let counts = report.counts();
        assert_eq!(counts.get(&StatusKind::Success), Some(&2));
        assert_eq!(counts.get(&StatusKind::PermissionDenied), Some(&1));
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn failure_does_not_stop_later_targets() {
        let discovery = FixedDiscovery(vec![
            PathBuf::from("/nonexistent/locked"),
            PathBuf::from("/nonexistent/after"),
        ]);
        let copier = RecordingCopier::default();
        let report = run(&discovery, &copier, &plan(false));

        assert_eq!(copier.seen.borrow().len(), 2);
        assert_eq!(report.outcomes[1].kind(), StatusKind::Success);
    }

    #[test]
    fn on_outcome_sees_targets_in_order() {
        let discovery = FixedDiscovery(vec![
            PathBuf::from("/nonexistent/one"),
            PathBuf::from("/nonexistent/two"),
        ]);
        let p = plan(true);
        let targets = collect_targets(&discovery, &p);

        let mut streamed = Vec::new();
        let report = sync_targets(&RecordingCopier::default(), &p, targets, |o| {
            streamed.push(o.project().root_path().to_path_buf())
        });

        assert_eq!(
            streamed,
            vec![
                PathBuf::from("/nonexistent/one"),
                PathBuf::from("/nonexistent/two")
            ]
        );
        assert_eq!(report.counts().get(&StatusKind::DryRun), Some(&2));
    }
}
