use crate::graph::{DependencyGraph, Module};
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{BTreeSet, HashSet};

/// Transitive dependency and dependent sets over a fixed graph
pub struct TransitiveClosure<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> TransitiveClosure<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Every module reachable by following edges forward, excluding `module`
    pub fn dependencies(&self, module: &str) -> BTreeSet<&'g Module> {
        self.reach(module, Direction::Outgoing)
    }

    /// Every module that reaches `module`, excluding `module`
    pub fn dependents(&self, module: &str) -> BTreeSet<&'g Module> {
        self.reach(module, Direction::Incoming)
    }

    /// Worklist traversal. Each node enters the visited set once, so cycles
    /// terminate after at most |modules| steps.
    fn reach(&self, module: &str, direction: Direction) -> BTreeSet<&'g Module> {
        let Some(start) = self.graph.node_index(module) else {
            return BTreeSet::new();
        };

        let inner = self.graph.inner();
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut worklist = vec![start];

        while let Some(idx) = worklist.pop() {
            for next in inner.neighbors_directed(idx, direction) {
                if visited.insert(next) {
                    worklist.push(next);
                }
            }
        }

        visited
            .into_iter()
            .filter(|&idx| idx != start)
            .filter_map(|idx| self.graph.module_at(idx))
            .collect()
    }
}
