//! Analyses over a built [`DependencyGraph`](crate::graph::DependencyGraph)
//!
//! Every analysis reads the graph and the module sources; none mutates the
//! graph. Policy checks (unused dependencies, unused resources) turn their
//! reports into errors with `into_result`, advisory checks only log.

mod allowance;
mod closure;
pub mod imports;
mod metrics;
mod ownership;
mod portability;
mod resources;
mod unused_deps;
mod usage;

pub use allowance::AllowanceResolver;
pub use closure::TransitiveClosure;
pub use imports::{ConventionMatcher, ConventionSet, FoundReference, ImportMatcher, ReferenceKind};
pub use metrics::{Centrality, DependencyMetrics, DEFAULT_CENTRALITY_LIMIT};
pub use ownership::{prefixes_for, strip_common_suffixes, PackageOwnership};
pub use portability::{Advisory, ModuleStatus, PortabilityChecker, PortabilityReport};
pub use resources::{ResourceReport, ResourceUsageDetector};
pub use unused_deps::{UnusedDependencyChecker, UnusedMap, UnusedReport};
pub use usage::{ConsumerText, UsageScanner};
