use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Build capabilities of a module, as reported by the host build system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModuleKind {
    /// `com.android.library`
    AndroidLibrary { resources_enabled: bool },
    /// `com.android.application`
    AndroidApplication,
    /// `java`, `java-library` or `org.jetbrains.kotlin.jvm`
    JvmLibrary,
    /// `org.jetbrains.kotlin.multiplatform`
    Multiplatform,
    Other,
}

impl ModuleKind {
    /// Android library or application
    pub fn is_platform(&self) -> bool {
        matches!(
            self,
            ModuleKind::AndroidLibrary { .. } | ModuleKind::AndroidApplication
        )
    }

    pub fn has_resources_enabled(&self) -> bool {
        matches!(
            self,
            ModuleKind::AndroidLibrary {
                resources_enabled: true
            }
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleKind::AndroidLibrary { .. } => "android library",
            ModuleKind::AndroidApplication => "android application",
            ModuleKind::JvmLibrary => "jvm library",
            ModuleKind::Multiplatform => "multiplatform library",
            ModuleKind::Other => "module",
        }
    }
}

/// A project module, keyed by its path (`:feature:login`)
#[derive(Debug, Clone)]
pub struct Module {
    pub path: String,

    /// Absolute module directory
    pub dir: PathBuf,

    /// Android namespace, when the module declares one
    pub namespace: Option<String>,

    pub kind: ModuleKind,
}

impl Module {
    pub fn new(path: impl Into<String>, dir: impl Into<PathBuf>, kind: ModuleKind) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            namespace: None,
            kind,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// First path segment: `:feature:login` -> `feature`
    pub fn top_level_segment(&self) -> &str {
        top_level_segment(&self.path)
    }
}

pub(crate) fn top_level_segment(path: &str) -> &str {
    let trimmed = path.strip_prefix(':').unwrap_or(path);
    trimmed.split(':').next().unwrap_or(trimmed)
}

// Identity is the path alone.
impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for Module {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Module {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// How a dependency is exposed to the origin's own dependents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeTrait {
    /// Re-exported to dependents
    Api,
    /// Private to the origin
    Implementation,
}

impl EdgeTrait {
    /// `api`, `debugApi`, `testFixturesApi` are api; everything else is implementation
    pub fn from_configuration(configuration: &str) -> Self {
        if configuration.to_lowercase().ends_with("api") {
            EdgeTrait::Api
        } else {
            EdgeTrait::Implementation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeTrait::Api => "api",
            EdgeTrait::Implementation => "impl",
        }
    }
}

/// Merged trait set of every configuration declaring the same edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTraits(BTreeSet<EdgeTrait>);

impl EdgeTraits {
    pub fn single(edge_trait: EdgeTrait) -> Self {
        Self(BTreeSet::from([edge_trait]))
    }

    pub fn insert(&mut self, edge_trait: EdgeTrait) {
        self.0.insert(edge_trait);
    }

    pub fn merge(&mut self, other: &EdgeTraits) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn is_api(&self) -> bool {
        self.0.contains(&EdgeTrait::Api)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeTrait> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
