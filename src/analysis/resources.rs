//! Unused Android resources detection
//!
//! Android libraries keep resource processing enabled by default. A library
//! whose sources never reference `R` and that ships no resource files pays
//! for an `R` class it does not need.

use crate::config::Config;
use crate::discovery::SourceFinder;
use crate::error::{ModgraphError, Result};
use crate::graph::{DependencyGraph, Module};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Resource accessors recognised as plain substrings
const RESOURCE_ACCESSORS: &[&str] = &["R.drawable.", "R.string.", "R.plurals.", "R.color."];

/// Result of the unused resources check
#[derive(Debug, Default, Clone)]
pub struct ResourceReport {
    /// Modules that should disable Android resources, in path order
    pub modules_to_disable: Vec<String>,

    /// Lines referencing resources, per checked module
    pub references: BTreeMap<String, BTreeSet<String>>,
}

impl ResourceReport {
    pub fn into_result(self) -> Result<()> {
        if self.modules_to_disable.is_empty() {
            Ok(())
        } else {
            Err(ModgraphError::UnusedResources(self.modules_to_disable))
        }
    }
}

/// Detector for Android libraries with needlessly enabled resources
pub struct ResourceUsageDetector<'a> {
    config: &'a Config,

    /// `com.example.ui.R`: another library's R class
    library_r: Regex,
}

impl<'a> ResourceUsageDetector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            library_r: Regex::new(r"[a-zA-Z_][a-zA-Z0-9_]*\.[a-zA-Z_][a-zA-Z0-9_]*\.R\b")
                .expect("library R pattern is valid"),
        }
    }

    /// Check every Android library that keeps resources enabled
    pub fn check(&self, graph: &DependencyGraph) -> ResourceReport {
        let finder = SourceFinder::new(self.config);
        let candidates: Vec<&Module> = graph.resource_enabled_modules().collect();

        let results: Vec<(String, BTreeSet<String>, bool)> = candidates
            .par_iter()
            .map(|module| {
                let references = self.resource_references(&finder, module);
                let has_files = finder.has_resource_files(module);
                debug!(
                    "{}: {} resource references, resource files: {}",
                    module.path,
                    references.len(),
                    has_files
                );
                (module.path.clone(), references, has_files)
            })
            .collect();

        let mut report = ResourceReport::default();
        for (path, references, has_files) in results {
            if references.is_empty() && !has_files {
                report.modules_to_disable.push(path.clone());
            }
            report.references.insert(path, references);
        }

        info!(
            "Checked {} modules for resources, {} can disable them",
            candidates.len(),
            report.modules_to_disable.len()
        );
        report
    }

    /// Source lines that reference an R class
    pub fn resource_references(&self, finder: &SourceFinder<'_>, module: &Module) -> BTreeSet<String> {
        finder
            .source_files(module)
            .iter()
            .filter_map(|file| file.readable_contents())
            .flat_map(|contents| {
                contents
                    .lines()
                    .filter(|line| self.is_resource_reference(line))
                    .map(|line| line.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn is_resource_reference(&self, line: &str) -> bool {
        RESOURCE_ACCESSORS.iter().any(|accessor| line.contains(accessor))
            || self.library_r.is_match(line)
    }
}
