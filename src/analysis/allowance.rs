//! Transitive allowance
//!
//! A feature module may receive model or delegate types from a lower layer
//! through a use case without ever importing that layer. The dependency on
//! the lower layer then looks unused although the types flow through it.
//! The resolver walks entry-point imports (use cases, base types) to their
//! declaring files and allows the modules owning the types imported there.

use super::imports::{ConventionSet, FoundReference, ReferenceKind};
use super::ownership::PackageOwnership;
use crate::config::Config;
use crate::discovery::{declaring_file, SourceFile, SourceFinder};
use crate::graph::Module;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Resolves allow-lists for consumer modules.
///
/// Owned by a single analysis run; the memo lives and dies with it.
pub struct AllowanceResolver<'a> {
    config: &'a Config,
    finder: &'a SourceFinder<'a>,
    ownership: &'a PackageOwnership<'a>,
    conventions: ConventionSet,

    /// (reference package, reference name) -> packages flowing through it
    memo: HashMap<(String, String), BTreeSet<String>>,

    /// Owner module path -> its source files, walked once
    sources: HashMap<String, Vec<SourceFile>>,
}

impl<'a> AllowanceResolver<'a> {
    pub fn new(
        config: &'a Config,
        finder: &'a SourceFinder<'a>,
        ownership: &'a PackageOwnership<'a>,
    ) -> Self {
        Self {
            config,
            finder,
            ownership,
            conventions: ConventionSet::from_config(&config.conventions),
            memo: HashMap::new(),
            sources: HashMap::new(),
        }
    }

    /// Module paths a consumer may depend on without referencing them.
    ///
    /// Empty unless the consumer matches a search-in-depth prefix.
    pub fn allowed_modules(&mut self, consumer: &Module) -> BTreeSet<String> {
        let mut allowed = BTreeSet::new();
        if !self.config.is_search_in_depth(&consumer.path) {
            return allowed;
        }

        for reference in self.entry_references(consumer) {
            trace!(
                "{}: found {:?} {}",
                consumer.path,
                reference.kind,
                reference.qualified_name()
            );
            for package in self.resolve_reference(&reference) {
                match self.ownership.owner_of(&package) {
                    Some(owner) if owner.path != consumer.path => {
                        trace!("{}: {} allows {}", consumer.path, package, owner.path);
                        allowed.insert(owner.path.clone());
                    }
                    Some(_) => {}
                    None => trace!("{}: no owner for {}", consumer.path, package),
                }
            }
        }

        debug!("Allowed modules for {}: {:?}", consumer.path, allowed);
        allowed
    }

    /// Business-logic and base-type imports of the consumer's sources
    fn entry_references(&self, consumer: &Module) -> BTreeSet<FoundReference> {
        self.finder
            .source_files(consumer)
            .iter()
            .filter_map(|file| file.readable_contents())
            .flat_map(|contents| {
                contents
                    .lines()
                    .filter_map(|line| self.conventions.match_entry(line))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Packages of the model and delegate types imported by the file
    /// declaring `reference`, plus the models those models import.
    fn resolve_reference(&mut self, reference: &FoundReference) -> BTreeSet<String> {
        let key = (reference.package.clone(), reference.name.clone());
        if let Some(packages) = self.memo.get(&key) {
            return packages.clone();
        }

        let mut packages = BTreeSet::new();
        for flowing in self.imports_of_declaring_file(&reference.package, &reference.name, false) {
            if flowing.kind == ReferenceKind::Model {
                for nested in self.imports_of_declaring_file(&flowing.package, &flowing.name, true) {
                    trace!(
                        "{} -> {} -> {}",
                        reference.name,
                        flowing.qualified_name(),
                        nested.qualified_name()
                    );
                    packages.insert(nested.package);
                }
            }
            packages.insert(flowing.package);
        }

        trace!("{} resolves to {:?}", reference.qualified_name(), packages);
        self.memo.insert(key, packages.clone());
        packages
    }

    /// Flowing-type imports of the file declaring `package.name` in its
    /// owning module; model imports only when `models_only`.
    fn imports_of_declaring_file(
        &mut self,
        package: &str,
        name: &str,
        models_only: bool,
    ) -> Vec<FoundReference> {
        let Some(owner) = self.ownership.owner_of(package) else {
            trace!("No owning module for {}.{}", package, name);
            return Vec::new();
        };
        let finder = self.finder;
        let sources = self
            .sources
            .entry(owner.path.clone())
            .or_insert_with(|| finder.source_files(owner));
        let Some(file) = declaring_file(sources.as_slice(), name) else {
            trace!("{} declares no file named {}", owner.path, name);
            return Vec::new();
        };
        let Some(contents) = file.readable_contents() else {
            return Vec::new();
        };

        contents
            .lines()
            .filter_map(|line| {
                if models_only {
                    self.conventions.match_model(line)
                } else {
                    self.conventions.match_flowing(line)
                }
            })
            .collect()
    }
}
