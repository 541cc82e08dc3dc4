mod loader;

pub use loader::{
    Config, ConventionsConfig, Direction, GraphConfig, PortabilityConfig, ShowLegend,
    UnusedConfig,
};
