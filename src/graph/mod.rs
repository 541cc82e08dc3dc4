mod builder;
mod module;
pub mod project;

pub use builder::GraphBuilder;
pub use module::{EdgeTrait, EdgeTraits, Module, ModuleKind};
pub use project::{DependencyEntry, ExternalDependencyEntry, KindName, ModuleEntry, ProjectModel};

pub(crate) use module::top_level_segment;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// The module dependency graph of one project.
///
/// Built once per run by [`GraphBuilder`] and read-only afterwards. Modules
/// iterate in path order so every report derived from the graph is stable
/// between runs.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Nodes are module paths, edges carry the merged traits
    inner: DiGraph<String, EdgeTraits>,

    node_map: HashMap<String, NodeIndex>,

    modules: BTreeMap<String, Module>,

    /// Project edges keyed by (origin, target) path
    edges: BTreeMap<(String, String), EdgeTraits>,

    /// External edges keyed by (origin path, coordinate)
    external_edges: BTreeMap<(String, String), EdgeTraits>,

    roots: Vec<String>,

    leaves: Vec<String>,

    root_dir: PathBuf,
}

impl DependencyGraph {
    pub(crate) fn new(root_dir: PathBuf) -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            modules: BTreeMap::new(),
            edges: BTreeMap::new(),
            external_edges: BTreeMap::new(),
            roots: Vec::new(),
            leaves: Vec::new(),
            root_dir,
        }
    }

    pub(crate) fn add_module(&mut self, module: Module) {
        let idx = self.inner.add_node(module.path.clone());
        self.node_map.insert(module.path.clone(), idx);
        self.modules.insert(module.path.clone(), module);
    }

    /// Both endpoints must already be present
    pub(crate) fn add_edge(&mut self, origin: &str, target: &str, traits: EdgeTraits) {
        if let (Some(&from), Some(&to)) = (self.node_map.get(origin), self.node_map.get(target)) {
            self.inner.add_edge(from, to, traits.clone());
            self.edges
                .insert((origin.to_string(), target.to_string()), traits);
        }
    }

    pub(crate) fn add_external_edge(&mut self, origin: &str, coordinate: &str, traits: EdgeTraits) {
        self.external_edges
            .entry((origin.to_string(), coordinate.to_string()))
            .or_default()
            .merge(&traits);
    }

    pub(crate) fn finish(&mut self) {
        self.roots = self
            .modules
            .keys()
            .filter(|path| self.direct_dependents(path).is_empty())
            .cloned()
            .collect();
        self.leaves = self
            .modules
            .keys()
            .filter(|path| self.direct_dependencies(path).is_empty())
            .cloned()
            .collect();
    }

    /// All modules in path order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn module(&self, path: &str) -> Option<&Module> {
        self.modules.get(path)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Project edges in (origin, target) order
    pub fn edges(&self) -> impl Iterator<Item = (&Module, &Module, &EdgeTraits)> {
        self.edges.iter().filter_map(|((origin, target), traits)| {
            Some((self.modules.get(origin)?, self.modules.get(target)?, traits))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn traits(&self, origin: &str, target: &str) -> Option<&EdgeTraits> {
        self.edges.get(&(origin.to_string(), target.to_string()))
    }

    pub(crate) fn node_index(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, EdgeTraits> {
        &self.inner
    }

    pub(crate) fn module_at(&self, idx: NodeIndex) -> Option<&Module> {
        self.inner
            .node_weight(idx)
            .and_then(|path| self.modules.get(path))
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&Module> {
        let Some(idx) = self.node_index(path) else {
            return Vec::new();
        };

        let mut neighbors: Vec<&Module> = self
            .inner
            .edges_directed(idx, direction)
            .filter_map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.module_at(other)
            })
            .collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// Modules the given module declares a dependency on
    pub fn direct_dependencies(&self, path: &str) -> Vec<&Module> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Modules declaring a dependency on the given module
    pub fn direct_dependents(&self, path: &str) -> Vec<&Module> {
        self.neighbors(path, Direction::Incoming)
    }

    /// External coordinates declared by a module
    pub fn external_dependencies(&self, path: &str) -> Vec<&str> {
        self.external_edges
            .keys()
            .filter(|(origin, _)| origin == path)
            .map(|(_, coordinate)| coordinate.as_str())
            .collect()
    }

    pub fn external_edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeTraits)> {
        self.external_edges
            .iter()
            .map(|((origin, coordinate), traits)| (origin.as_str(), coordinate.as_str(), traits))
    }

    pub fn is_platform(&self, path: &str) -> bool {
        self.module(path).map_or(false, |m| m.kind.is_platform())
    }

    /// Android libraries and applications
    pub fn platform_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.kind.is_platform())
    }

    /// Android libraries that keep Android resources enabled
    pub fn resource_enabled_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.kind.has_resources_enabled())
    }

    pub fn jvm_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.kind == ModuleKind::JvmLibrary)
    }

    pub fn multiplatform_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.kind == ModuleKind::Multiplatform)
    }

    /// Modules nothing in scope depends on
    pub fn roots(&self) -> impl Iterator<Item = &Module> {
        self.roots.iter().filter_map(|p| self.modules.get(p))
    }

    /// Modules without project dependencies
    pub fn leaves(&self) -> impl Iterator<Item = &Module> {
        self.leaves.iter().filter_map(|p| self.modules.get(p))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}
