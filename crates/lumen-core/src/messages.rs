use crate::config::ShellConfig;
use crate::wm::{WindowId, WindowProperties};

/// Events FROM async services TO GTK (updates UI)
#[derive(Debug, Clone)]
pub enum ShellEvent {
    // =========== Window Manager Events ===========

    /// The focused window changed; `None` when nothing has focus
    ActiveWindowChanged(Option<WindowId>),

    /// Some window's properties changed. `window` is `None` when the
    /// compositor does not say which one.
    WindowChanged {
        window: Option<WindowId>,
        properties: WindowProperties,
    },

    /// A monitor was added or removed; the available area must be re-read
    ScreenGeometryChanged,

    // =========== Connection Events ===========

    /// Successfully connected to Hyprland IPC
    HyprlandConnected,

    /// Lost connection to Hyprland IPC
    HyprlandDisconnected,

    // =========== Configuration Events ===========

    /// shell.json changed on disk and parsed cleanly. Background changes
    /// (`lumen-shell background`) arrive this way too.
    ConfigReloaded(ShellConfig),
}

impl ShellEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ShellEvent::ActiveWindowChanged(_) => "active-window-changed",
            ShellEvent::WindowChanged { .. } => "window-changed",
            ShellEvent::ScreenGeometryChanged => "screen-geometry-changed",
            ShellEvent::HyprlandConnected => "hyprland-connected",
            ShellEvent::HyprlandDisconnected => "hyprland-disconnected",
            ShellEvent::ConfigReloaded(_) => "config-reloaded",
        }
    }
}
