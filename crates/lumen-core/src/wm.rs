use bitflags::bitflags;
use compact_str::CompactString;
use std::fmt;

use crate::error::WmError;
use crate::geometry::Rect;

/// Opaque identifier of a top-level window
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(pub CompactString);

impl WindowId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

bitflags! {
    /// Window state bits reported by the window manager
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowState: u32 {
        const MAXIMIZED = 1 << 0;
        const FULLSCREEN = 1 << 1;
        const MINIMIZED = 1 << 2;
        const FLOATING = 1 << 3;
        const PINNED = 1 << 4;
    }
}

bitflags! {
    /// Which properties a window-changed notification is about
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowProperties: u32 {
        const NAME = 1 << 0;
        const STATE = 1 << 1;
        const GEOMETRY = 1 << 2;
        const DESKTOP = 1 << 3;
    }
}

/// A virtual desktop (workspace)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopInfo {
    pub id: i32,
    pub name: CompactString,
    pub windows: u32,
}

/// Query and command surface of the window manager.
///
/// All calls are synchronous and run on the UI thread, so implementations
/// must answer quickly.
pub trait WindowManager {
    fn active_window(&self) -> Option<WindowId>;

    fn window_name(&self, id: &WindowId) -> Result<String, WmError>;

    fn window_state(&self, id: &WindowId) -> Result<WindowState, WmError>;

    fn set_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError>;

    fn clear_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError>;

    fn minimize(&self, id: &WindowId) -> Result<(), WmError>;

    fn close_request(&self, id: &WindowId) -> Result<(), WmError>;

    fn desktops(&self) -> Result<Vec<DesktopInfo>, WmError>;

    /// Usable screen area with docked regions removed
    fn available_area(&self) -> Result<Rect, WmError>;
}
