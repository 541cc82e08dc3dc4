mod file_finder;

pub use file_finder::{declaring_file, FileType, SourceFile, SourceFinder};
