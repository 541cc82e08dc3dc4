use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for modgraph analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Module paths removed from the graph before any analysis
    pub ignored_modules: Vec<String>,

    /// External coordinates whose last segment marks a dependency or import as ignorable
    pub ignored_external_dependencies: Vec<String>,

    /// Module that wires everything together and is never checked for unused dependencies
    pub aggregator_module: String,

    /// Source directories, relative to a module directory
    pub source_roots: Vec<String>,

    /// Resource directories, relative to a module directory
    pub resource_roots: Vec<String>,

    /// Directory for diagnostic artifacts, relative to the project root
    pub output_dir: PathBuf,

    /// Unused dependency check configuration
    pub unused: UnusedConfig,

    /// Naming conventions used by the allowance resolver
    pub conventions: ConventionsConfig,

    /// Portability (plain Kotlin module) check configuration
    pub portability: PortabilityConfig,

    /// Graph rendering configuration
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnusedConfig {
    /// Generic directory names stripped from the end of derived package prefixes
    pub common_dirs: Vec<String>,

    /// Module path prefixes eligible for transitive allowance resolution
    pub search_in_depth: Vec<String>,

    /// Dependencies that only produce a warning when unused
    pub warn_only: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionsConfig {
    /// Class name suffixes of business-logic units (use cases, interactors)
    pub business_logic_suffixes: Vec<String>,

    /// Package segments holding shared base types
    pub base_segments: Vec<String>,

    /// Package segments holding model/data types
    pub model_segments: Vec<String>,

    /// Package segments holding delegates and updaters
    pub delegate_segments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortabilityConfig {
    /// Substring identifying platform imports and external coordinates
    pub platform_marker: String,

    /// Import prefix of the serialization marker type tolerated by the softer check
    pub serialization_marker: String,
}

/// Layout direction of rendered graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    LeftToRight,
    TopToBottom,
    BottomToTop,
    RightToLeft,
}

impl Direction {
    pub fn rankdir(&self) -> &'static str {
        match self {
            Direction::LeftToRight => "LR",
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::RightToLeft => "RL",
        }
    }
}

/// Where the legend is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShowLegend {
    None,
    #[default]
    OnlyInRootGraph,
    AllGraphs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// File name of the root graph
    pub file_name: String,

    pub direction: Direction,

    pub show_legend: ShowLegend,

    /// Attach repository links to module nodes
    pub link_module_text: bool,

    /// Cluster modules sharing a top-level segment
    pub group_modules: bool,

    /// Module path prefixes that get their own sub-graph
    pub groups: Vec<String>,

    /// Names salting the colour hash of modules containing them
    pub trigger_names: Vec<String>,

    /// Repository URL used for node links
    pub repo_url: Option<String>,

    pub main_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_modules: vec![],
            ignored_external_dependencies: vec![],
            aggregator_module: ":app".to_string(),
            source_roots: vec![
                "src/main/java".to_string(),
                "src/main/kotlin".to_string(),
                "src/gms/kotlin".to_string(),
                "src/gms/java".to_string(),
                "src/hms/kotlin".to_string(),
                "src/hms/java".to_string(),
            ],
            resource_roots: vec!["src/main/res".to_string()],
            output_dir: PathBuf::from("build/modgraph"),
            unused: UnusedConfig::default(),
            conventions: ConventionsConfig::default(),
            portability: PortabilityConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl Default for UnusedConfig {
    fn default() -> Self {
        Self {
            common_dirs: vec![],
            search_in_depth: vec![":feature".to_string(), ":plugin".to_string()],
            warn_only: vec![],
        }
    }
}

impl Default for ConventionsConfig {
    fn default() -> Self {
        Self {
            business_logic_suffixes: vec!["UseCase".to_string(), "UseCaseImpl".to_string()],
            base_segments: vec!["base".to_string()],
            model_segments: vec!["model".to_string(), "models".to_string()],
            delegate_segments: vec!["delegate".to_string(), "updater".to_string()],
        }
    }
}

impl Default for PortabilityConfig {
    fn default() -> Self {
        Self {
            platform_marker: "android".to_string(),
            serialization_marker: "android.os.Parcel".to_string(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            file_name: "dependency_graph.gv".to_string(),
            direction: Direction::default(),
            show_legend: ShowLegend::default(),
            link_module_text: true,
            group_modules: false,
            groups: vec![],
            trigger_names: vec![],
            repo_url: None,
            main_branch: "main".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".modgraph.yml",
            ".modgraph.yaml",
            ".modgraph.toml",
            "modgraph.yml",
            "modgraph.yaml",
            "modgraph.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn is_ignored_module(&self, path: &str) -> bool {
        self.ignored_modules.iter().any(|m| m == path)
    }

    /// Whether a consumer module is eligible for transitive allowance resolution
    pub fn is_search_in_depth(&self, path: &str) -> bool {
        self.unused
            .search_in_depth
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_warn_only(&self, dependency_path: &str) -> bool {
        self.unused.warn_only.iter().any(|m| m == dependency_path)
    }

    /// Substrings that make an external dependency or an import ignorable.
    ///
    /// `androidx.appcompat` contributes `appcompat`.
    pub fn ignored_external_tokens(&self) -> Vec<&str> {
        self.ignored_external_dependencies
            .iter()
            .filter_map(|entry| entry.rsplit('.').next())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Absolute artifact directory for a project root
    pub fn output_dir_in(&self, project_root: &Path) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            project_root.join(&self.output_dir)
        }
    }
}
