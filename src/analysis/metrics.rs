use super::closure::TransitiveClosure;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of modules taken from each table for centrality
pub const DEFAULT_CENTRALITY_LIMIT: usize = 150;

/// One row of the centrality table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Centrality {
    pub module: String,
    pub dependencies: usize,
    pub dependents: usize,
}

/// Transitive dependency and dependent counts per module
#[derive(Debug, Clone, Default)]
pub struct DependencyMetrics {
    dependencies: BTreeMap<String, usize>,

    /// Modules nothing depends on are absent
    dependents: BTreeMap<String, usize>,
}

impl DependencyMetrics {
    pub fn compute(graph: &DependencyGraph) -> Self {
        let closure = TransitiveClosure::new(graph);
        let mut metrics = Self::default();

        for module in graph.modules() {
            metrics
                .dependencies
                .insert(module.path.clone(), closure.dependencies(&module.path).len());

            let dependents = closure.dependents(&module.path).len();
            if dependents > 0 {
                metrics.dependents.insert(module.path.clone(), dependents);
            }
        }

        metrics
    }

    /// Module path -> transitive dependency count, alphabetical
    pub fn alphabetic_dependencies(&self) -> &BTreeMap<String, usize> {
        &self.dependencies
    }

    /// Module path -> transitive dependent count, alphabetical
    pub fn alphabetic_dependents(&self) -> &BTreeMap<String, usize> {
        &self.dependents
    }

    /// Highest count first, ties by path
    pub fn sorted_dependencies(&self) -> Vec<(&str, usize)> {
        sorted_desc(&self.dependencies)
    }

    pub fn sorted_dependents(&self) -> Vec<(&str, usize)> {
        sorted_desc(&self.dependents)
    }

    /// Union of the `limit` top modules of both tables, most depended-on first
    pub fn centrality(&self, limit: usize) -> Vec<Centrality> {
        let mut modules: Vec<&str> = self
            .sorted_dependencies()
            .into_iter()
            .take(limit)
            .chain(self.sorted_dependents().into_iter().take(limit))
            .map(|(module, _)| module)
            .collect();
        modules.sort_unstable();
        modules.dedup();

        let mut rows: Vec<Centrality> = modules
            .into_iter()
            .map(|module| Centrality {
                module: module.to_string(),
                dependencies: self.dependencies.get(module).copied().unwrap_or(0),
                dependents: self.dependents.get(module).copied().unwrap_or(0),
            })
            .collect();
        rows.sort_by(|a, b| b.dependents.cmp(&a.dependents).then_with(|| a.module.cmp(&b.module)));
        rows
    }
}

fn sorted_desc(table: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<(&str, usize)> = table.iter().map(|(m, c)| (m.as_str(), *c)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}
