//! Portability check
//!
//! Finds Android modules that could be plain Kotlin/JVM modules: no
//! resources, no Android libraries, no Android imports and no Android
//! project dependencies. Findings are advisory only.

use super::closure::TransitiveClosure;
use super::imports::imported_path;
use crate::config::Config;
use crate::discovery::SourceFinder;
use crate::graph::{DependencyGraph, Module};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Portability status of a platform module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Uses resources, Android libraries or Android APIs
    StrictPlatform,
    /// Nothing ties the module to the platform
    CanBePortable,
    /// Only the serialization marker ties the module to the platform
    CanBePortableWithoutSerialization,
    /// Statuses of the platform modules it transitively depends on
    HasPlatformDependency(Vec<(String, ModuleStatus)>),
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleStatus::StrictPlatform => write!(f, "StrictPlatform"),
            ModuleStatus::CanBePortable => write!(f, "CanBePortable"),
            ModuleStatus::CanBePortableWithoutSerialization => {
                write!(f, "CanBePortableWithoutSerialization")
            }
            ModuleStatus::HasPlatformDependency(deps) => {
                let paths: Vec<&str> = deps.iter().map(|(p, _)| p.as_str()).collect();
                write!(f, "HasPlatformDependency[{}]", paths.join(", "))
            }
        }
    }
}

/// Advisory produced from the module statuses
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Advisory {
    Portable(String),
    PortableWithoutSerialization(String),
    /// Portable once its platform dependencies become portable
    PortableAfterDependencies(String),
}

impl Advisory {
    pub fn module(&self) -> &str {
        match self {
            Advisory::Portable(m)
            | Advisory::PortableWithoutSerialization(m)
            | Advisory::PortableAfterDependencies(m) => m,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Portable(m) => {
                write!(f, "{m} does not contain platform dependencies, make it a Kotlin module")
            }
            Advisory::PortableWithoutSerialization(m) => {
                write!(f, "{m} could be a Kotlin module without Parcel serialization")
            }
            Advisory::PortableAfterDependencies(m) => write!(
                f,
                "{m} has platform dependencies, could be a Kotlin module if they change"
            ),
        }
    }
}

/// Statuses of every platform module, in path order
#[derive(Debug, Clone, Default)]
pub struct PortabilityReport {
    pub statuses: Vec<(String, ModuleStatus)>,
}

impl PortabilityReport {
    pub fn status(&self, path: &str) -> Option<&ModuleStatus> {
        self.statuses
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, status)| status)
    }

    /// Modules that could drop their platform dependency, deduplicated and sorted
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut memo: HashMap<String, bool> = HashMap::new();
        let mut advisories = BTreeSet::new();

        for (path, status) in &self.statuses {
            match status {
                ModuleStatus::CanBePortable => {
                    advisories.insert(Advisory::Portable(path.clone()));
                }
                ModuleStatus::CanBePortableWithoutSerialization => {
                    advisories.insert(Advisory::PortableWithoutSerialization(path.clone()));
                }
                ModuleStatus::HasPlatformDependency(_) => {
                    if can_become_portable(path, status, &mut memo) {
                        advisories.insert(Advisory::PortableAfterDependencies(path.clone()));
                    }
                }
                ModuleStatus::StrictPlatform => {}
            }
        }

        advisories.into_iter().collect()
    }

    pub fn log_advisories(&self) {
        for advisory in self.advisories() {
            warn!("{}", advisory);
        }
    }
}

fn can_become_portable(path: &str, status: &ModuleStatus, memo: &mut HashMap<String, bool>) -> bool {
    if let Some(&cached) = memo.get(path) {
        return cached;
    }
    let result = match status {
        ModuleStatus::CanBePortable | ModuleStatus::CanBePortableWithoutSerialization => true,
        ModuleStatus::StrictPlatform => false,
        ModuleStatus::HasPlatformDependency(deps) => deps
            .iter()
            .all(|(dep, dep_status)| can_become_portable(dep, dep_status, memo)),
    };
    memo.insert(path.to_string(), result);
    result
}

/// What ties a single module to the platform, ignoring its project dependencies
#[derive(Debug, Clone, Default)]
struct PlatformUsage {
    has_resources: bool,
    external: Vec<String>,
    imports: BTreeSet<String>,
}

pub struct PortabilityChecker<'a> {
    config: &'a Config,
}

impl<'a> PortabilityChecker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn check(&self, graph: &DependencyGraph) -> PortabilityReport {
        let finder = SourceFinder::new(self.config);
        let platform: Vec<&Module> = graph.platform_modules().collect();

        // file scans run in parallel, status folding is sequential
        let usage: HashMap<String, PlatformUsage> = platform
            .par_iter()
            .map(|module| (module.path.clone(), self.platform_usage(graph, &finder, module)))
            .collect();

        let closure = TransitiveClosure::new(graph);
        let mut memo = HashMap::new();
        let mut in_progress = HashSet::new();

        let statuses = platform
            .iter()
            .map(|module| {
                let status =
                    self.status_of(&closure, &usage, &module.path, &mut memo, &mut in_progress);
                debug!("{} - {}", module.path, status);
                (module.path.clone(), status)
            })
            .collect();

        PortabilityReport { statuses }
    }

    fn platform_usage(
        &self,
        graph: &DependencyGraph,
        finder: &SourceFinder<'_>,
        module: &Module,
    ) -> PlatformUsage {
        let marker = self.config.portability.platform_marker.as_str();
        let tokens = self.config.ignored_external_tokens();
        let ignorable = |s: &str| tokens.iter().any(|t| s.contains(t));

        let external = graph
            .external_dependencies(&module.path)
            .into_iter()
            .filter(|coordinate| coordinate.contains(marker) && !ignorable(coordinate))
            .map(str::to_string)
            .collect();

        let imports = finder
            .source_files(module)
            .iter()
            .filter_map(|file| file.readable_contents())
            .flat_map(|contents| {
                contents
                    .lines()
                    .filter_map(imported_path)
                    .filter(|import| import.contains(marker) && !ignorable(import))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        PlatformUsage {
            has_resources: finder.has_resource_files(module),
            external,
            imports,
        }
    }

    fn status_of(
        &self,
        closure: &TransitiveClosure<'_>,
        usage: &HashMap<String, PlatformUsage>,
        path: &str,
        memo: &mut HashMap<String, ModuleStatus>,
        in_progress: &mut HashSet<String>,
    ) -> ModuleStatus {
        if let Some(status) = memo.get(path) {
            return status.clone();
        }
        if !in_progress.insert(path.to_string()) {
            // dependency cycle: the module is already being resolved further up
            return ModuleStatus::HasPlatformDependency(Vec::new());
        }

        let empty = PlatformUsage::default();
        let own = usage.get(path).unwrap_or(&empty);
        let platform_deps: Vec<String> = closure
            .dependencies(path)
            .into_iter()
            .filter(|m| m.kind.is_platform())
            .map(|m| m.path.clone())
            .collect();

        let serialization = self.config.portability.serialization_marker.as_str();
        let only_serialization = own.imports.iter().all(|i| i.contains(serialization));

        let status = if own.has_resources || !own.external.is_empty() {
            ModuleStatus::StrictPlatform
        } else if platform_deps.is_empty() && own.imports.is_empty() {
            ModuleStatus::CanBePortable
        } else if platform_deps.is_empty() && only_serialization {
            ModuleStatus::CanBePortableWithoutSerialization
        } else if !only_serialization {
            ModuleStatus::StrictPlatform
        } else {
            ModuleStatus::HasPlatformDependency(
                platform_deps
                    .into_iter()
                    .map(|dep| {
                        let status = self.status_of(closure, usage, &dep, memo, in_progress);
                        (dep, status)
                    })
                    .collect(),
            )
        };

        in_progress.remove(path);
        memo.insert(path.to_string(), status.clone());
        status
    }
}
