//! Import statement recognition
//!
//! Naming conventions (use-case suffixes, `model` packages, ...) depend on the
//! project, so they are configuration data fed into [`ConventionMatcher`]s
//! behind the [`ImportMatcher`] trait.

use crate::config::ConventionsConfig;
use regex::Regex;
use std::sync::OnceLock;

/// `import com.app.domain.GetUserUseCase`, optionally aliased, optional `;`
const IMPORT_PATTERN: &str = r"^\s*import\s+(?:static\s+)?([\w.]+)\.(\w+)\s*(?:as\s+\w+\s*)?;?\s*$";

/// Category of an imported type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceKind {
    /// Use case / interactor
    BusinessLogic,
    /// Shared base type
    BaseType,
    /// Model / data type
    Model,
    /// Delegate or updater
    Delegate,
}

/// An imported type found in source text
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FoundReference {
    pub package: String,
    pub name: String,
    pub kind: ReferenceKind,
}

impl FoundReference {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

/// Recognizes one kind of import line
pub trait ImportMatcher: Send + Sync {
    fn kind(&self) -> ReferenceKind;

    fn matches(&self, line: &str) -> Option<FoundReference>;
}

fn import_regex() -> &'static Regex {
    static IMPORT: OnceLock<Regex> = OnceLock::new();
    IMPORT.get_or_init(|| Regex::new(IMPORT_PATTERN).expect("import pattern is valid"))
}

fn imported_path_regex() -> &'static Regex {
    static IMPORTED_PATH: OnceLock<Regex> = OnceLock::new();
    IMPORTED_PATH.get_or_init(|| {
        Regex::new(r"^\s*import\s+(?:static\s+)?([\w.]+)").expect("imported path pattern is valid")
    })
}

/// Split an import line into (package, simple name)
pub fn parse_import(line: &str) -> Option<(&str, &str)> {
    let caps = import_regex().captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Dotted path of any import line, wildcards included (`android.os.`)
pub fn imported_path(line: &str) -> Option<&str> {
    Some(imported_path_regex().captures(line)?.get(1)?.as_str())
}

#[derive(Debug, Clone)]
enum Rule {
    /// Simple name ends with one of the suffixes
    NameSuffix(Vec<String>),
    /// Package contains one of the segments
    PackageSegment(Vec<String>),
}

/// Import matcher driven by a naming convention
#[derive(Debug, Clone)]
pub struct ConventionMatcher {
    kind: ReferenceKind,
    rule: Rule,
}

impl ConventionMatcher {
    pub fn name_suffix(kind: ReferenceKind, suffixes: &[String]) -> Self {
        Self {
            kind,
            rule: Rule::NameSuffix(suffixes.to_vec()),
        }
    }

    pub fn package_segment(kind: ReferenceKind, segments: &[String]) -> Self {
        Self {
            kind,
            rule: Rule::PackageSegment(segments.to_vec()),
        }
    }
}

impl ImportMatcher for ConventionMatcher {
    fn kind(&self) -> ReferenceKind {
        self.kind
    }

    fn matches(&self, line: &str) -> Option<FoundReference> {
        let (package, name) = parse_import(line)?;

        let matched = match &self.rule {
            Rule::NameSuffix(suffixes) => suffixes.iter().any(|s| name.ends_with(s.as_str())),
            Rule::PackageSegment(segments) => package
                .split('.')
                .any(|part| segments.iter().any(|s| s == part)),
        };

        matched.then(|| FoundReference {
            package: package.to_string(),
            name: name.to_string(),
            kind: self.kind,
        })
    }
}

/// Matchers used by the allowance resolver
pub struct ConventionSet {
    /// Entry points searched in the consumer
    pub entry: Vec<Box<dyn ImportMatcher>>,

    /// Types that flow back through an entry point
    pub flowing: Vec<Box<dyn ImportMatcher>>,
}

impl ConventionSet {
    pub fn from_config(config: &ConventionsConfig) -> Self {
        Self {
            entry: vec![
                Box::new(ConventionMatcher::name_suffix(
                    ReferenceKind::BusinessLogic,
                    &config.business_logic_suffixes,
                )),
                Box::new(ConventionMatcher::package_segment(
                    ReferenceKind::BaseType,
                    &config.base_segments,
                )),
            ],
            flowing: vec![
                Box::new(ConventionMatcher::package_segment(
                    ReferenceKind::Model,
                    &config.model_segments,
                )),
                Box::new(ConventionMatcher::package_segment(
                    ReferenceKind::Delegate,
                    &config.delegate_segments,
                )),
            ],
        }
    }

    /// First entry-point match of a line
    pub fn match_entry(&self, line: &str) -> Option<FoundReference> {
        self.entry.iter().find_map(|m| m.matches(line))
    }

    /// First flowing-type match of a line
    pub fn match_flowing(&self, line: &str) -> Option<FoundReference> {
        self.flowing.iter().find_map(|m| m.matches(line))
    }

    /// Model imports only
    pub fn match_model(&self, line: &str) -> Option<FoundReference> {
        self.match_flowing(line)
            .filter(|r| r.kind == ReferenceKind::Model)
    }
}
