mod component;
mod layer_window;
mod paint;
mod screen;

pub use component::ComponentContext;
pub use layer_window::{panel_anchors, ExclusiveZone, LayerMargins, LayerRole, LayerWindow};
pub use paint::{image_surface, paint_image};
pub use screen::{monitor_area, watch_monitors};
