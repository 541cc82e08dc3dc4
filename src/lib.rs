//! modgraph - Module dependency graph analysis for multi-module Android (Kotlin/Java) projects
//!
//! The host build system exports its modules and declared dependencies as a
//! project model; modgraph turns it into an immutable graph and runs checks
//! over the graph and the module sources.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Project Model** - Load modules, project edges and library edges
//! 2. **Graph Building** - Filter ignored modules, merge edges, classify modules
//! 3. **Discovery** - Find Kotlin, Java and XML files per module
//! 4. **Analysis** - Transitive closure, package ownership, unused dependencies,
//!    portability, unused resources, metrics
//! 5. **Reporting** - Graphviz documents, text/JSON artifacts, terminal summaries

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod report;

pub use analysis::{
    DependencyMetrics, ModuleStatus, PortabilityChecker, PortabilityReport, ResourceUsageDetector,
    TransitiveClosure, UnusedDependencyChecker, UnusedReport,
};
pub use config::Config;
pub use discovery::SourceFinder;
pub use error::ModgraphError;
pub use graph::{DependencyGraph, GraphBuilder, Module, ModuleKind, ProjectModel};
pub use report::{ArtifactWriter, DotRenderer, TerminalReporter};
