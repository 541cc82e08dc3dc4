use crate::discovery::SourceFinder;
use crate::graph::Module;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::trace;

/// Textual usage check of a dependency's packages inside a consumer module.
///
/// A plain substring search over source and resource files: layouts and
/// other XML reference classes by their qualified name, so import lines
/// alone are not enough.
pub struct UsageScanner<'a> {
    finder: &'a SourceFinder<'a>,
}

impl<'a> UsageScanner<'a> {
    pub fn new(finder: &'a SourceFinder<'a>) -> Self {
        Self { finder }
    }

    /// Read every scannable file of a consumer once
    pub fn load(&self, consumer: &Module) -> ConsumerText {
        let files = self
            .finder
            .scannable_files(consumer)
            .into_iter()
            .filter_map(|file| {
                let contents = file.readable_contents()?;
                Some((file.path, contents))
            })
            .collect();

        ConsumerText {
            module: consumer.path.clone(),
            files,
        }
    }

    /// True as soon as one line of one file contains one of the packages
    pub fn is_used(&self, consumer: &Module, target_packages: &BTreeSet<String>) -> bool {
        self.load(consumer).uses(target_packages)
    }
}

/// Contents of a consumer's scannable files, reused across its dependencies
pub struct ConsumerText {
    module: String,
    files: Vec<(PathBuf, String)>,
}

impl ConsumerText {
    /// True as soon as one line of one file contains one of the packages
    pub fn uses(&self, target_packages: &BTreeSet<String>) -> bool {
        if target_packages.is_empty() {
            return false;
        }

        for (path, contents) in &self.files {
            let hit = contents
                .lines()
                .find(|line| target_packages.iter().any(|p| line.contains(p.as_str())));
            if let Some(line) = hit {
                trace!(
                    "{} uses {:?} in {}: {}",
                    self.module,
                    target_packages,
                    path.display(),
                    line.trim()
                );
                return true;
            }
        }

        false
    }
}
