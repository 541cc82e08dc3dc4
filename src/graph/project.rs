//! Project model exported by the host build system
//!
//! The build tool enumerates modules, their plugins and declared
//! dependencies; modgraph only consumes the exported facts:
//!
//! ```json
//! {
//!   "modules": [
//!     { "path": ":app", "dir": "app", "kind": "android-application" },
//!     { "path": ":core", "dir": "core", "kind": "android-library",
//!       "namespace": "com.example.core", "resources_enabled": false }
//!   ],
//!   "dependencies": [
//!     { "from": ":app", "to": ":core", "configuration": "implementation" }
//!   ],
//!   "external_dependencies": [
//!     { "from": ":core", "coordinate": "androidx.core:core-ktx", "configuration": "api" }
//!   ]
//! }
//! ```

use super::{Module, ModuleKind};
use crate::error::{ModgraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Module type names accepted in the project model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum KindName {
    AndroidLibrary,
    AndroidApplication,
    JvmLibrary,
    Multiplatform,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub path: String,

    /// Module directory, relative to the project root unless absolute
    pub dir: PathBuf,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub kind: KindName,

    /// Only meaningful for Android libraries
    #[serde(default = "default_true")]
    pub resources_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ModuleEntry {
    pub fn new(path: impl Into<String>, dir: impl Into<PathBuf>, kind: KindName) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            namespace: None,
            kind,
            resources_enabled: true,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_resources_enabled(mut self, enabled: bool) -> Self {
        self.resources_enabled = enabled;
        self
    }

    pub fn kind(&self) -> ModuleKind {
        match self.kind {
            KindName::AndroidLibrary => ModuleKind::AndroidLibrary {
                resources_enabled: self.resources_enabled,
            },
            KindName::AndroidApplication => ModuleKind::AndroidApplication,
            KindName::JvmLibrary => ModuleKind::JvmLibrary,
            KindName::Multiplatform => ModuleKind::Multiplatform,
            KindName::Other => ModuleKind::Other,
        }
    }

    pub(crate) fn to_module(&self, root: &Path) -> Module {
        let dir = if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            root.join(&self.dir)
        };
        Module {
            path: self.path.clone(),
            dir,
            namespace: self.namespace.clone(),
            kind: self.kind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub from: String,
    pub to: String,
    pub configuration: String,
}

impl DependencyEntry {
    pub fn new(from: &str, to: &str, configuration: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            configuration: configuration.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDependencyEntry {
    pub from: String,

    /// `group:name`
    pub coordinate: String,

    pub configuration: String,
}

impl ExternalDependencyEntry {
    pub fn new(from: &str, coordinate: &str, configuration: &str) -> Self {
        Self {
            from: from.to_string(),
            coordinate: coordinate.to_string(),
            configuration: configuration.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Project root; relative values resolve against the model file location
    #[serde(default)]
    pub root: Option<PathBuf>,

    pub modules: Vec<ModuleEntry>,

    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,

    #[serde(default)]
    pub external_dependencies: Vec<ExternalDependencyEntry>,
}

const DEFAULT_MODEL_NAMES: [&str; 5] = [
    "modgraph-project.json",
    "modgraph-project.yaml",
    "modgraph-project.yml",
    "modgraph-project.toml",
    "build/modgraph-project.json",
];

impl ProjectModel {
    /// Load a project model from JSON, YAML or TOML
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModgraphError::ProjectModel {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed: std::result::Result<Self, String> = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            "toml" => toml::from_str(&contents).map_err(|e| e.to_string()),
            _ => serde_json::from_str(&contents).map_err(|e| e.to_string()),
        };

        let mut model = parsed.map_err(|reason| ModgraphError::ProjectModel {
            path: path.to_path_buf(),
            reason,
        })?;

        // A relative root is anchored at the model file's directory; a model
        // exported into build/ describes the directory above it.
        let mut base = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        if model.root.is_none() && base.file_name().map_or(false, |n| n == "build") {
            base.pop();
        }
        model.root = Some(match model.root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base,
        });

        Ok(model)
    }

    /// Find and load the project model from its default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        for name in &DEFAULT_MODEL_NAMES {
            let path = project_root.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(ModgraphError::ProjectModelMissing(project_root.to_path_buf()))
    }

    /// Root directory module dirs are resolved against
    pub fn resolved_root(&self, fallback: &Path) -> PathBuf {
        match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => fallback.join(root),
            None => fallback.to_path_buf(),
        }
    }
}
