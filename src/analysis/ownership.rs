//! Package ownership
//!
//! Maps every module to the package prefixes its sources live in, and a
//! fully qualified name back to the module that most specifically owns it.

use crate::discovery::SourceFinder;
use crate::graph::{DependencyGraph, Module};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Owned package prefixes per module plus longest-prefix reverse lookup
#[derive(Debug)]
pub struct PackageOwnership<'g> {
    graph: &'g DependencyGraph,

    /// Module path -> owned prefixes
    packages: BTreeMap<String, BTreeSet<String>>,
}

impl<'g> PackageOwnership<'g> {
    /// Derive the prefixes of every module from its source tree
    pub fn resolve(
        graph: &'g DependencyGraph,
        finder: &SourceFinder<'_>,
        common_dirs: &[String],
    ) -> Self {
        let modules: Vec<&Module> = graph.modules().collect();
        let packages: BTreeMap<String, BTreeSet<String>> = modules
            .par_iter()
            .map(|module| {
                let prefixes = prefixes_for(module, finder, common_dirs);
                debug!("{} - {:?}", module.path, prefixes);
                (module.path.clone(), prefixes)
            })
            .collect();

        Self { graph, packages }
    }

    /// Build from an already known mapping
    pub fn from_packages(
        graph: &'g DependencyGraph,
        packages: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        Self { graph, packages }
    }

    /// Prefixes owned by a module; empty for unknown modules
    pub fn packages(&self, module: &str) -> BTreeSet<String> {
        self.packages.get(module).cloned().unwrap_or_default()
    }

    /// (module path, prefixes) in module path order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.packages.iter().map(|(m, p)| (m.as_str(), p))
    }

    /// The module owning a fully qualified package or class name.
    ///
    /// Candidates are prefixes where one side is a segment prefix of the
    /// other; the longest common segment prefix wins and ties go to the first
    /// module in path order.
    pub fn owner_of(&self, package: &str) -> Option<&'g Module> {
        let mut best: Option<(&str, usize)> = None;

        for (module, prefixes) in &self.packages {
            for prefix in prefixes {
                if !(is_segment_prefix(prefix, package) || is_segment_prefix(package, prefix)) {
                    continue;
                }
                let score = common_segments(prefix, package);
                if score > 0 && best.map_or(true, |(_, s)| score > s) {
                    best = Some((module.as_str(), score));
                }
            }
        }

        best.and_then(|(module, _)| self.graph.module(module))
    }
}

/// Package prefixes owned by one module.
///
/// For every source root the shortest derived prefix is kept: the most
/// general package of the root stands for the whole tree, so usages from
/// deeply nested packages still match. The module namespace is always owned.
pub fn prefixes_for(
    module: &Module,
    finder: &SourceFinder<'_>,
    common_dirs: &[String],
) -> BTreeSet<String> {
    let mut result = BTreeSet::new();

    if let Some(namespace) = &module.namespace {
        result.insert(namespace.clone());
    }

    for (root, files) in finder.source_files_by_root(module) {
        let derived: BTreeSet<String> = files
            .iter()
            .filter_map(|file| package_of(&root, &file.path, common_dirs))
            .collect();

        if let Some(shortest) = derived.iter().map(String::len).min() {
            result.extend(derived.into_iter().filter(|p| p.len() == shortest));
        }
    }

    result
}

/// Dotted package of a file's directory relative to its source root.
///
/// Files directly inside the root have no package; an empty prefix would
/// match every line of every file.
fn package_of(root: &Path, file: &Path, common_dirs: &[String]) -> Option<String> {
    let relative = file.parent()?.strip_prefix(root).ok()?;
    let dotted = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join(".");

    let stripped = strip_common_suffixes(&dotted, common_dirs);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Remove configured trailing segments until none matches.
///
/// `com.app.feature.ui.data` with `[ui, data]` becomes `com.app.feature`.
pub fn strip_common_suffixes(prefix: &str, common_dirs: &[String]) -> String {
    let mut current = prefix.to_string();
    loop {
        let suffix = common_dirs
            .iter()
            .map(|dir| format!(".{dir}"))
            .find(|suffix| current.ends_with(suffix.as_str()));
        match suffix {
            Some(suffix) => {
                let new_len = current.len() - suffix.len();
                current.truncate(new_len);
            }
            None => return current,
        }
    }
}

fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split('.').filter(|s| !s.is_empty())
}

fn common_segments(a: &str, b: &str) -> usize {
    segments(a)
        .zip(segments(b))
        .take_while(|(x, y)| x == y)
        .count()
}

/// `com.app` is a segment prefix of `com.app.feature` but not of `com.application`
fn is_segment_prefix(prefix: &str, name: &str) -> bool {
    let prefix_len = segments(prefix).count();
    prefix_len > 0 && common_segments(prefix, name) == prefix_len
}
