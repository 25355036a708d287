use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use tracing::debug;

use lumen_core::{Edge as PanelEdge, Point, Size};

const OUTPUT_EDGES: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

/// What a layer surface is used for; decides layer, anchors and namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    /// Screen-edge panel docked at the given edge
    Panel(PanelEdge),
    /// Full-output background below every window
    Desktop,
}

impl LayerRole {
    pub fn layer(&self) -> Layer {
        match self {
            LayerRole::Panel(_) => Layer::Top,
            LayerRole::Desktop => Layer::Background,
        }
    }

    pub fn anchors(&self) -> Vec<Edge> {
        match self {
            LayerRole::Panel(edge) => panel_anchors(*edge).to_vec(),
            LayerRole::Desktop => OUTPUT_EDGES.to_vec(),
        }
    }

    /// Panels start without a zone; the strut is reserved once geometry is known
    pub fn exclusive_zone(&self) -> ExclusiveZone {
        match self {
            LayerRole::Panel(_) => ExclusiveZone::None,
            LayerRole::Desktop => ExclusiveZone::Ignore,
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            LayerRole::Panel(_) => "lumen-panel",
            LayerRole::Desktop => "lumen-desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusiveZone {
    /// No exclusive zone, but respect other surfaces' zones
    None,
    /// Ignore other surfaces' zones and cover the whole output
    Ignore,
    /// Reserve this many pixels along the anchored edge
    Fixed(i32),
}

impl ExclusiveZone {
    fn pixels(self) -> i32 {
        match self {
            ExclusiveZone::None => 0,
            ExclusiveZone::Ignore => -1,
            ExclusiveZone::Fixed(size) => size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerMargins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl LayerMargins {
    /// Margins that put a `size` surface at `origin` inside a `screen` sized output
    pub fn place(origin: Point, size: Size, screen: Size) -> Self {
        let far = |extent: i32, start: i32, span: i32| {
            let value = i64::from(extent) - i64::from(start) - i64::from(span);
            value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        Self {
            top: origin.y,
            left: origin.x,
            right: far(screen.width, origin.x, size.width),
            bottom: far(screen.height, origin.y, size.height),
        }
    }

    fn along(&self, edge: Edge) -> i32 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            _ => self.left,
        }
    }
}

/// A panel anchors to its edge and both perpendicular edges, so the
/// compositor honors its exclusive zone and the margins fix the span
pub fn panel_anchors(edge: PanelEdge) -> [Edge; 3] {
    match edge {
        PanelEdge::Top => [Edge::Top, Edge::Left, Edge::Right],
        PanelEdge::Bottom => [Edge::Bottom, Edge::Left, Edge::Right],
        PanelEdge::Left => [Edge::Left, Edge::Top, Edge::Bottom],
        PanelEdge::Right => [Edge::Right, Edge::Top, Edge::Bottom],
    }
}

/// Undecorated application window living on a layer-shell surface
pub struct LayerWindow {
    window: ApplicationWindow,
}

impl LayerWindow {
    pub fn new(app: &Application, role: LayerRole) -> Self {
        let window = ApplicationWindow::builder()
            .application(app)
            .decorated(false)
            .resizable(false)
            .build();

        window.init_layer_shell();
        window.set_layer(role.layer());
        window.set_keyboard_mode(KeyboardMode::None);
        window.set_namespace(role.namespace());

        let layer_window = Self { window };
        layer_window.set_anchors(&role.anchors());
        layer_window.set_exclusive_zone(role.exclusive_zone());
        debug!("Created {} surface as {:?}", role.namespace(), role);
        layer_window
    }

    pub fn hide(&self) {
        self.window.set_visible(false);
    }

    pub fn show(&self) {
        self.window.present();
    }

    pub fn close(&self) {
        self.window.close();
    }

    /// Anchor to exactly the given edges and release the rest
    pub fn set_anchors(&self, anchors: &[Edge]) {
        for edge in OUTPUT_EDGES {
            self.window.set_anchor(edge, anchors.contains(&edge));
        }
    }

    pub fn set_margins(&self, margins: LayerMargins) {
        for edge in OUTPUT_EDGES {
            self.window.set_margin(edge, margins.along(edge));
        }
    }

    pub fn set_exclusive_zone(&self, zone: ExclusiveZone) {
        self.window.set_exclusive_zone(zone.pixels());
    }
}

impl std::ops::Deref for LayerWindow {
    type Target = ApplicationWindow;

    fn deref(&self) -> &Self::Target {
        &self.window
    }
}
