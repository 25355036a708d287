pub mod blur;
pub mod composition;
pub mod config;
pub mod desktop;
pub mod error;
pub mod geometry;
pub mod image;
pub mod messages;
pub mod model;
pub mod panel;
pub mod services;
pub mod subscription;
pub mod winctrl;
pub mod wm;

pub use blur::{BlurCompositor, BlurredLayer};
pub use composition::{compose, Layout, LayoutDirection, LayoutEntry, PanelContainer, STRETCH};
pub use config::{ConfigGroup, ConfigPaths, ModelKind, PanelConfig, ShellConfig};
pub use desktop::{DesktopSurface, ImageLoader};
pub use error::{ConfigError, DesktopError, WmError};
pub use geometry::{recompute_geometry, Dimension, Edge, Offsets, PanelGeometry, PanelRequest, Point, Rect, Size};
pub use image::Image;
pub use messages::ShellEvent;
pub use model::{LoadContext, Model, Registry, Resolved, SharedModel};
pub use panel::{Panel, PanelSurface};
pub use services::{ConfigWatcher, HyprlandService, HyprlandWindowManager, ServiceHub};
pub use subscription::{Signal, Subscription, SubscriptionSet};
pub use winctrl::{ControlState, ControlView, WindowControlSync};
pub use wm::{DesktopInfo, WindowId, WindowManager, WindowProperties, WindowState};
