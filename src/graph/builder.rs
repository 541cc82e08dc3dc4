use super::{DependencyGraph, EdgeTrait, EdgeTraits, ModuleEntry, ProjectModel};
use crate::config::Config;
use crate::error::{ModgraphError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

/// External dependency configurations that count as declared library use
const EXTERNAL_CONFIGURATIONS: [&str; 2] = ["implementation", "api"];

/// Builder for constructing the module dependency graph from host facts
pub struct GraphBuilder<'a> {
    config: &'a Config,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the graph.
    ///
    /// Ignored modules and every edge touching them are dropped, duplicate
    /// edges merge their traits and self edges are skipped. An edge naming a
    /// module that was never declared is a configuration error and nothing
    /// is built.
    pub fn build(&self, model: &ProjectModel, project_root: &Path) -> Result<DependencyGraph> {
        let root_dir = model.resolved_root(project_root);

        let mut declared: BTreeMap<&str, &ModuleEntry> = BTreeMap::new();
        for entry in &model.modules {
            if declared.insert(entry.path.as_str(), entry).is_some() {
                return Err(ModgraphError::DuplicateModule(entry.path.clone()));
            }
        }

        let mut edges: BTreeMap<(&str, &str), EdgeTraits> = BTreeMap::new();
        for dep in &model.dependencies {
            for endpoint in [&dep.from, &dep.to] {
                if !declared.contains_key(endpoint.as_str()) {
                    return Err(ModgraphError::UnknownModule {
                        origin: dep.from.clone(),
                        target: dep.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }

            if self.config.is_ignored_module(&dep.from) || self.config.is_ignored_module(&dep.to) {
                trace!("Skipping ignored edge {} -> {}", dep.from, dep.to);
                continue;
            }
            if dep.from == dep.to {
                trace!("Skipping self edge on {}", dep.from);
                continue;
            }

            edges
                .entry((dep.from.as_str(), dep.to.as_str()))
                .or_default()
                .insert(EdgeTrait::from_configuration(&dep.configuration));
        }

        for ext in &model.external_dependencies {
            if !declared.contains_key(ext.from.as_str()) {
                return Err(ModgraphError::UnknownModule {
                    origin: ext.from.clone(),
                    target: ext.coordinate.clone(),
                    missing: ext.from.clone(),
                });
            }
        }

        let mut graph = DependencyGraph::new(root_dir.clone());

        for (path, entry) in &declared {
            if self.config.is_ignored_module(path) {
                debug!("Ignoring module {}", path);
                continue;
            }
            trace!("Adding {} {}", entry.kind().display_name(), path);
            graph.add_module(entry.to_module(&root_dir));
        }

        for ((origin, target), traits) in edges {
            graph.add_edge(origin, target, traits);
        }

        for ext in &model.external_dependencies {
            if self.config.is_ignored_module(&ext.from)
                || !EXTERNAL_CONFIGURATIONS.contains(&ext.configuration.as_str())
            {
                continue;
            }
            graph.add_external_edge(
                &ext.from,
                &ext.coordinate,
                EdgeTraits::single(EdgeTrait::from_configuration(&ext.configuration)),
            );
        }

        graph.finish();

        debug!(
            "Built graph: {} modules, {} edges, {} roots, {} leaves",
            graph.module_count(),
            graph.edge_count(),
            graph.roots().count(),
            graph.leaves().count()
        );

        Ok(graph)
    }
}
