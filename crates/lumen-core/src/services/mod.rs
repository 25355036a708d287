mod config_watcher;
mod hub;
mod hyprland;

pub use config_watcher::ConfigWatcher;
pub use hub::ServiceHub;
pub use hyprland::{is_hyprland_running, window_id, HyprlandService, HyprlandWindowManager, MINIMIZED_WORKSPACE};
