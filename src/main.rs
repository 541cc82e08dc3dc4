use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Report, Result};
use modgraph::analysis::{
    DependencyMetrics, PortabilityChecker, ResourceUsageDetector, UnusedDependencyChecker,
    DEFAULT_CENTRALITY_LIMIT,
};
use modgraph::{ArtifactWriter, Config, DotRenderer, GraphBuilder, ProjectModel, TerminalReporter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// modgraph - Module dependency graph analysis for multi-module Android projects
#[derive(Parser, Debug)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Project model exported by the build (default: modgraph-project.json in PATH)
    #[arg(long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check for unused module dependencies
    #[arg(long)]
    unused_deps: bool,

    /// Check which Android modules could be plain Kotlin modules
    #[arg(long)]
    portability: bool,

    /// Check for Android libraries that can disable resources
    #[arg(long)]
    unused_resources: bool,

    /// Write transitive dependency and dependent metrics
    #[arg(long)]
    metrics: bool,

    /// Render Graphviz dependency graphs
    #[arg(long)]
    graph: bool,

    /// Modules to drop from the graph (can be specified multiple times)
    #[arg(long, value_name = "PATH")]
    ignore_module: Vec<String>,

    /// Dependencies that only warn when unused (can be specified multiple times)
    #[arg(long, value_name = "PATH")]
    warn_only: Vec<String>,

    /// Directory for graphs and artifacts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Modules taken from each metrics table for centrality
    #[arg(long, default_value_t = DEFAULT_CENTRALITY_LIMIT)]
    centrality_limit: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

/// Tasks in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Graph,
    Metrics,
    Portability,
    UnusedResources,
    UnusedDeps,
}

impl Task {
    fn label(&self) -> &'static str {
        match self {
            Task::Graph => "Rendering graphs",
            Task::Metrics => "Computing metrics",
            Task::Portability => "Checking portability",
            Task::UnusedResources => "Checking resources",
            Task::UnusedDeps => "Checking unused dependencies",
        }
    }
}

impl Cli {
    /// Selected tasks; all of them when none is selected
    fn tasks(&self) -> Vec<Task> {
        let selected = [
            (self.graph, Task::Graph),
            (self.metrics, Task::Metrics),
            (self.portability, Task::Portability),
            (self.unused_resources, Task::UnusedResources),
            (self.unused_deps, Task::UnusedDeps),
        ];
        if selected.iter().any(|(on, _)| *on) {
            selected
                .into_iter()
                .filter(|(on, _)| *on)
                .map(|(_, task)| task)
                .collect()
        } else {
            selected.into_iter().map(|(_, task)| task).collect()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("modgraph v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    run_analysis(&config, &cli)
}

/// Verbose output includes every step of the allowance walk
const VERBOSE_FILTER: &str = "debug,modgraph::analysis::allowance=trace";

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    config.ignored_modules.extend(cli.ignore_module.iter().cloned());
    config.unused.warn_only.extend(cli.warn_only.iter().cloned());
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    let model = match &cli.project {
        Some(path) => ProjectModel::load(path)?,
        None => ProjectModel::from_default_locations(&cli.path)?,
    };
    info!(
        "Loaded {} modules and {} dependencies",
        model.modules.len(),
        model.dependencies.len()
    );

    // configuration errors end the run before any output
    let graph = GraphBuilder::new(config).build(&model, &cli.path)?;
    let output_dir = config.output_dir_in(&cli.path);
    let writer = ArtifactWriter::new(&output_dir);
    let reporter = TerminalReporter::new();

    if !cli.quiet {
        reporter.print_graph_summary(&graph);
    }

    let tasks = cli.tasks();
    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(tasks.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .into_diagnostic()?
            .progress_chars("#>-"),
    );

    let mut failures: Vec<Report> = Vec::new();
    let mut written: Vec<PathBuf> = Vec::new();

    for task in tasks {
        pb.set_message(task.label());
        match task {
            Task::Graph => {
                written.extend(DotRenderer::new(&config.graph).write_all(&graph, &output_dir)?);
            }
            Task::Metrics => {
                let metrics = DependencyMetrics::compute(&graph);
                written.extend(writer.write_metrics(&metrics, cli.centrality_limit)?);
                if !cli.quiet {
                    pb.suspend(|| reporter.print_metrics(&metrics));
                }
            }
            Task::Portability => {
                let report = PortabilityChecker::new(config).check(&graph);
                written.push(writer.write_module_status(&report)?);
                report.log_advisories();
                if !cli.quiet {
                    pb.suspend(|| reporter.print_portability(&report));
                }
            }
            Task::UnusedResources => {
                let report = ResourceUsageDetector::new(config).check(&graph);
                pb.suspend(|| reporter.print_resources(&report));
                if let Err(e) = report.into_result() {
                    failures.push(e.into());
                }
            }
            Task::UnusedDeps => {
                let report = UnusedDependencyChecker::new(config).check(&graph);
                written.push(writer.write_packages(&report.packages)?);
                written.push(writer.write_allowed(&report.allowed)?);
                report.log_warnings();
                pb.suspend(|| reporter.print_unused(&report));
                if let Err(e) = report.into_result() {
                    failures.push(e.into());
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !cli.quiet {
        reporter.print_written(&written);
        println!(
            "{}",
            format!("Analysis finished in {:.2}s", start_time.elapsed().as_secs_f64()).dimmed()
        );
    }

    // every policy violation is reported, the last one ends the run
    match failures.pop() {
        Some(last) => {
            for failure in failures {
                error!("{:?}", failure);
            }
            Err(last)
        }
        None => Ok(()),
    }
}
