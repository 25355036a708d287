mod loader;
mod widget;

pub use loader::PixbufLoader;
pub use widget::DesktopComponent;
