pub mod common;
pub mod desktop;
pub mod panel;
pub mod shell;
pub mod theme;
pub mod winctrl;

pub use common::{ComponentContext, LayerRole, LayerWindow};
pub use desktop::{DesktopComponent, PixbufLoader};
pub use panel::{BoxContainer, GtkPanel, GtkPanelSurface};
pub use shell::Shell;
pub use theme::{load_css, SHELL_CSS};
pub use winctrl::{GtkControlView, WindowControlModel};
