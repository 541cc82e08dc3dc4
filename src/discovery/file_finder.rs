use crate::config::Config;
use crate::graph::Module;
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Type of source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Kotlin,
    Java,
    Xml,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "kt" | "kts" => Some(FileType::Kotlin),
            "java" => Some(FileType::Java),
            "xml" => Some(FileType::Xml),
            _ => None,
        }
    }

    /// Check if this is a source code file (Kotlin or Java)
    pub fn is_source(&self) -> bool {
        matches!(self, FileType::Kotlin | FileType::Java)
    }
}

/// Represents a discovered source or resource file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Type of source file
    pub file_type: FileType,
}

impl SourceFile {
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        Self { path, file_type }
    }

    /// Load and return owned contents; invalid UTF-8 sequences become U+FFFD
    pub fn read_contents(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path).into_diagnostic()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Contents, or `None` when the file cannot be read.
    ///
    /// An unreadable file contributes no evidence; it never aborts a scan.
    pub fn readable_contents(&self) -> Option<String> {
        match self.read_contents() {
            Ok(contents) => Some(contents),
            Err(e) => {
                trace!("Skipping unreadable file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// File name without extension (`GetUserUseCase.kt` -> `GetUserUseCase`)
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Finds the source and resource files of a module
pub struct SourceFinder<'a> {
    config: &'a Config,
}

impl<'a> SourceFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Existing source roots of a module, in configured order
    pub fn source_dirs(&self, module: &Module) -> Vec<PathBuf> {
        existing_dirs(module, &self.config.source_roots)
    }

    /// Existing resource roots of a module
    pub fn resource_dirs(&self, module: &Module) -> Vec<PathBuf> {
        existing_dirs(module, &self.config.resource_roots)
    }

    /// Kotlin and Java files grouped by the source root they live in
    pub fn source_files_by_root(&self, module: &Module) -> Vec<(PathBuf, Vec<SourceFile>)> {
        self.source_dirs(module)
            .into_iter()
            .map(|dir| {
                let files = scan_directory(&dir)
                    .into_iter()
                    .filter(|f| f.file_type.is_source())
                    .collect();
                (dir, files)
            })
            .collect()
    }

    /// Every Kotlin and Java file of a module
    pub fn source_files(&self, module: &Module) -> Vec<SourceFile> {
        self.source_files_by_root(module)
            .into_iter()
            .flat_map(|(_, files)| files)
            .collect()
    }

    /// Source files plus the Kotlin, Java and XML files under resource roots
    pub fn scannable_files(&self, module: &Module) -> Vec<SourceFile> {
        let mut files = self.source_files(module);
        for dir in self.resource_dirs(module) {
            files.extend(scan_directory(&dir));
        }
        files
    }

    /// The source file declaring a top-level type, matched by file stem
    pub fn find_declaring_file(&self, module: &Module, simple_name: &str) -> Option<SourceFile> {
        declaring_file(&self.source_files(module), simple_name).cloned()
    }

    /// Whether any resource root of the module contains at least one file
    pub fn has_resource_files(&self, module: &Module) -> bool {
        self.resource_dirs(module).iter().any(|dir| {
            walkdir::WalkDir::new(dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .any(|e| e.file_type().is_file())
        })
    }
}

/// First file in an already listed tree whose stem is `simple_name`
pub fn declaring_file<'f>(files: &'f [SourceFile], simple_name: &str) -> Option<&'f SourceFile> {
    files.iter().find(|f| f.stem() == Some(simple_name))
}

fn existing_dirs(module: &Module, roots: &[String]) -> Vec<PathBuf> {
    roots
        .iter()
        .map(|root| module.dir.join(root))
        .filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                trace!("Directory does not exist: {}", dir.display());
            }
            exists
        })
        .collect()
}

/// Scan a single directory for Kotlin, Java and XML files, sorted by path
fn scan_directory(dir: &Path) -> Vec<SourceFile> {
    let walker = WalkBuilder::new(dir)
        .hidden(true)           // Skip hidden files
        .git_ignore(true)       // Respect .gitignore
        .git_exclude(true)      // Respect .git/info/exclude
        .ignore(true)           // Respect .ignore files
        .follow_links(false)    // Don't follow symlinks
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let path = entry.path();
            let file_type = FileType::from_path(path)?;

            trace!("Found {:?}: {}", file_type, path.display());
            Some(SourceFile::new(path.to_path_buf(), file_type))
        })
        .collect()
}
