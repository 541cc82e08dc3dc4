mod artifacts;
mod dot;
mod terminal;

pub use artifacts::{
    ArtifactWriter, ALLOWED_FILE, ALPHABETIC_DEPENDENCIES_FILE, ALPHABETIC_DEPENDENTS_FILE,
    CENTRALITY_FILE, MODULE_STATUS_FILE, PACKAGES_FILE, SORTED_DEPENDENCIES_FILE,
    SORTED_DEPENDENTS_FILE,
};
pub use dot::{group_file_name, module_color, DotRenderer};
pub use terminal::TerminalReporter;
