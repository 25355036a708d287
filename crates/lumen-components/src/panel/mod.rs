mod container;
mod surface;
mod widget;

pub use container::BoxContainer;
pub use surface::GtkPanelSurface;
pub use widget::{apply_style, attach_background, create_panel, GtkPanel};
