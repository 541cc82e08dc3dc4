use crate::analysis::{
    Advisory, DependencyMetrics, PortabilityReport, ResourceReport, UnusedMap, UnusedReport,
};
use crate::graph::DependencyGraph;
use colored::Colorize;
use std::path::PathBuf;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Rows shown per metrics table
    top: usize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { top: 10 }
    }

    pub fn print_graph_summary(&self, graph: &DependencyGraph) {
        println!();
        println!(
            "{}",
            format!(
                "{} modules, {} dependencies",
                graph.module_count(),
                graph.edge_count()
            )
            .bold()
        );
        println!(
            "  {} platform, {} jvm, {} multiplatform",
            graph.platform_modules().count(),
            graph.jvm_modules().count(),
            graph.multiplatform_modules().count()
        );
        println!(
            "  {} roots, {} leaves",
            graph.roots().count(),
            graph.leaves().count()
        );
    }

    pub fn print_unused(&self, report: &UnusedReport) {
        println!();
        if report.is_clean() {
            println!("{}", "No unused dependencies found!".green().bold());
            return;
        }

        if !report.failures.is_empty() {
            println!(
                "{}",
                format!("Found {} unused dependencies:", report.failure_count())
                    .red()
                    .bold()
            );
            self.print_unused_map(&report.failures);
        }
        if !report.warnings.is_empty() {
            println!(
                "{}",
                format!("{} unused warn-only dependencies:", report.warning_count())
                    .yellow()
                    .bold()
            );
            self.print_unused_map(&report.warnings);
        }
    }

    fn print_unused_map(&self, unused: &UnusedMap) {
        for (module, deps) in unused {
            println!("{}", module.cyan().bold());
            for dep in deps {
                println!("  {} {}", "→".dimmed(), dep);
            }
        }
    }

    pub fn print_portability(&self, report: &PortabilityReport) {
        let advisories = report.advisories();
        println!();
        if advisories.is_empty() {
            println!(
                "{}",
                format!("{} platform modules checked, none can drop the platform", report.statuses.len())
                    .green()
            );
            return;
        }

        println!(
            "{}",
            format!("{} modules could become Kotlin modules:", advisories.len())
                .yellow()
                .bold()
        );
        for advisory in &advisories {
            let marker = match advisory {
                Advisory::Portable(_) => "●".green().bold(),
                Advisory::PortableWithoutSerialization(_) => "◉".bright_green(),
                Advisory::PortableAfterDependencies(_) => "○".yellow(),
            };
            println!("  {} {}", marker, advisory);
        }
    }

    pub fn print_resources(&self, report: &ResourceReport) {
        println!();
        if report.modules_to_disable.is_empty() {
            println!("{}", "No modules with unused resources".green());
            return;
        }
        println!(
            "{}",
            format!(
                "{} modules can disable Android resources:",
                report.modules_to_disable.len()
            )
            .red()
            .bold()
        );
        for module in &report.modules_to_disable {
            println!("  {} {}", "→".dimmed(), module.cyan());
        }
    }

    pub fn print_metrics(&self, metrics: &DependencyMetrics) {
        println!();
        println!("{}", "Most dependencies (transitive):".bold());
        for (module, count) in metrics.sorted_dependencies().into_iter().take(self.top) {
            println!("  {:>5}  {}", count.to_string().cyan(), module);
        }
        println!("{}", "Most dependents (transitive):".bold());
        for (module, count) in metrics.sorted_dependents().into_iter().take(self.top) {
            println!("  {:>5}  {}", count.to_string().cyan(), module);
        }
    }

    pub fn print_written(&self, paths: &[PathBuf]) {
        for path in paths {
            println!("{} {}", "Written:".dimmed(), path.display());
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
