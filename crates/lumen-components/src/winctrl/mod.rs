mod widget;

pub use widget::{GtkControlView, SharedControls, WindowControlModel};
