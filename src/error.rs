//! Error types for graph construction and policy checks

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or checking the module graph
#[derive(Error, Diagnostic, Debug)]
pub enum ModgraphError {
    /// A declared edge points at a module that was never declared
    #[error("Dependency {origin} -> {target} references unknown module {missing}")]
    #[diagnostic(
        code(modgraph::unknown_module),
        help("Every module used in `dependencies` must be listed in `modules`")
    )]
    UnknownModule {
        origin: String,
        target: String,
        missing: String,
    },

    #[error("Module {0} is declared more than once")]
    #[diagnostic(code(modgraph::duplicate_module))]
    DuplicateModule(String),

    #[error("Failed to load project model {path}: {reason}")]
    #[diagnostic(code(modgraph::project_model))]
    ProjectModel { path: PathBuf, reason: String },

    #[error("No project model found in {0}")]
    #[diagnostic(
        code(modgraph::project_model_missing),
        help("Export the module graph to modgraph-project.json or pass --project")
    )]
    ProjectModelMissing(PathBuf),

    /// Policy violation: the full list of offenders is carried so one run shows all of them
    #[error("Modules with unused dependencies: \n{}", format_unused(.0))]
    #[diagnostic(code(modgraph::unused_dependencies))]
    UnusedDependencies(BTreeMap<String, BTreeSet<String>>),

    #[error("Modules to disable resources: {}", .0.join(", "))]
    #[diagnostic(
        code(modgraph::unused_resources),
        help("Set `buildFeatures.androidResources = false` in these modules")
    )]
    UnusedResources(Vec<String>),
}

fn format_unused(unused: &BTreeMap<String, BTreeSet<String>>) -> String {
    unused
        .iter()
        .map(|(module, deps)| {
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            format!("{} -> [{}]", module, deps.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, ModgraphError>;
