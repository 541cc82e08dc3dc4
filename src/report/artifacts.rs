use crate::analysis::{DependencyMetrics, PortabilityReport, UnusedMap};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PACKAGES_FILE: &str = "matching_modules_with_package.txt";
pub const ALLOWED_FILE: &str = "allowed_modules.json";
pub const MODULE_STATUS_FILE: &str = "module_status.txt";
pub const SORTED_DEPENDENCIES_FILE: &str = "sorted_dependencies_in_depth.txt";
pub const SORTED_DEPENDENTS_FILE: &str = "sorted_dependents_in_depth.txt";
pub const ALPHABETIC_DEPENDENCIES_FILE: &str = "alphabetic_dependencies_in_depth.json";
pub const ALPHABETIC_DEPENDENTS_FILE: &str = "alphabetic_dependents_in_depth.json";
pub const CENTRALITY_FILE: &str = "centrality.txt";

/// Writes diagnostic text and JSON artifacts into the output directory
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `:module - [com.app.a, com.app.b]` per module
    pub fn write_packages(&self, packages: &UnusedMap) -> Result<PathBuf> {
        let mut text = String::new();
        for (module, prefixes) in packages {
            let prefixes: Vec<&str> = prefixes.iter().map(String::as_str).collect();
            let _ = writeln!(text, "{} - [{}]", module, prefixes.join(", "));
        }
        self.write(PACKAGES_FILE, &text)
    }

    pub fn write_allowed(&self, allowed: &UnusedMap) -> Result<PathBuf> {
        self.write_json(ALLOWED_FILE, allowed)
    }

    pub fn write_module_status(&self, report: &PortabilityReport) -> Result<PathBuf> {
        let mut text = String::new();
        for (module, status) in &report.statuses {
            let _ = writeln!(text, "{} - {}", module, status);
        }
        self.write(MODULE_STATUS_FILE, &text)
    }

    /// Sorted and alphabetic tables of both axes, plus the centrality table
    pub fn write_metrics(&self, metrics: &DependencyMetrics, centrality_limit: usize) -> Result<Vec<PathBuf>> {
        let mut written = vec![
            self.write(SORTED_DEPENDENCIES_FILE, &count_lines(&metrics.sorted_dependencies()))?,
            self.write(SORTED_DEPENDENTS_FILE, &count_lines(&metrics.sorted_dependents()))?,
            self.write_json(ALPHABETIC_DEPENDENCIES_FILE, metrics.alphabetic_dependencies())?,
            self.write_json(ALPHABETIC_DEPENDENTS_FILE, metrics.alphabetic_dependents())?,
        ];

        let mut centrality = String::new();
        for row in metrics.centrality(centrality_limit) {
            let _ = writeln!(
                centrality,
                "{} | dependencies - {} | dependents - {}",
                row.module, row.dependencies, row.dependents
            );
        }
        written.push(self.write(CENTRALITY_FILE, &centrality)?);

        Ok(written)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(value).into_diagnostic()?;
        self.write(name, &json)
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", self.output_dir.display()))?;

        let path = self.output_dir.join(name);
        fs::write(&path, contents)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn count_lines(rows: &[(&str, usize)]) -> String {
    rows.iter().fold(String::new(), |mut text, (module, count)| {
        let _ = writeln!(text, "{} - {}", module, count);
        text
    })
}
