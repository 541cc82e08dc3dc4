use super::allowance::AllowanceResolver;
use super::closure::TransitiveClosure;
use super::ownership::PackageOwnership;
use super::usage::UsageScanner;
use crate::config::Config;
use crate::discovery::SourceFinder;
use crate::error::{ModgraphError, Result};
use crate::graph::DependencyGraph;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Module path -> dependency paths
pub type UnusedMap = BTreeMap<String, BTreeSet<String>>;

/// Outcome of the unused dependency check
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnusedReport {
    /// Unused dependencies that fail the run
    pub failures: UnusedMap,

    /// Unused dependencies on warn-only modules
    pub warnings: UnusedMap,

    /// Allow-lists of the consumers that needed one
    pub allowed: UnusedMap,

    /// Owned package prefixes per module
    pub packages: UnusedMap,
}

impl UnusedReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.warnings.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.values().map(BTreeSet::len).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(BTreeSet::len).sum()
    }

    /// Log every warning-level finding
    pub fn log_warnings(&self) {
        for (module, deps) in &self.warnings {
            warn!("{} does not use directly dependencies: {:?}", module, deps);
        }
    }

    /// Fails with every offending module when hard failures exist
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(ModgraphError::UnusedDependencies(self.failures))
        }
    }
}

/// Classifies each transitive dependency of each module as used, allowed or unused
pub struct UnusedDependencyChecker<'a> {
    config: &'a Config,
}

impl<'a> UnusedDependencyChecker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn check(&self, graph: &DependencyGraph) -> UnusedReport {
        let finder = SourceFinder::new(self.config);
        let ownership = PackageOwnership::resolve(graph, &finder, &self.config.unused.common_dirs);
        let closure = TransitiveClosure::new(graph);
        let scanner = UsageScanner::new(&finder);
        let mut resolver = AllowanceResolver::new(self.config, &finder, &ownership);

        let mut report = UnusedReport {
            packages: ownership
                .entries()
                .map(|(module, prefixes)| (module.to_string(), prefixes.clone()))
                .collect(),
            ..UnusedReport::default()
        };

        for module in graph.modules() {
            if module.path == self.config.aggregator_module {
                debug!("Skipping aggregator module {}", module.path);
                continue;
            }

            let dependencies = closure.dependencies(&module.path);
            if dependencies.is_empty() {
                continue;
            }
            let text = scanner.load(module);

            // computed on the first dependency that is not textually used
            let mut allowed: Option<BTreeSet<String>> = None;

            for dependency in dependencies {
                let packages = ownership.packages(&dependency.path);
                if text.uses(&packages) {
                    continue;
                }

                let allowed = allowed.get_or_insert_with(|| resolver.allowed_modules(module));
                if allowed.contains(&dependency.path) {
                    debug!("{} -> {} is allowed", module.path, dependency.path);
                    continue;
                }

                let bucket = if self.config.is_warn_only(&dependency.path) {
                    &mut report.warnings
                } else {
                    &mut report.failures
                };
                bucket
                    .entry(module.path.clone())
                    .or_default()
                    .insert(dependency.path.clone());
            }

            if let Some(allowed) = allowed.filter(|a| !a.is_empty()) {
                report.allowed.insert(module.path.clone(), allowed);
            }
        }

        info!(
            "Unused dependency check: {} failures, {} warnings",
            report.failure_count(),
            report.warning_count()
        );
        report
    }
}
