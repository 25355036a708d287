mod group;
mod panel;
mod paths;
mod shell;

pub use group::{ConfigGroup, ModelKind};
pub use panel::PanelConfig;
pub use paths::ConfigPaths;
pub use shell::ShellConfig;
