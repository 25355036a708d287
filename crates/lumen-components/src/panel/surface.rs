use gtk4::prelude::*;
use gtk4::{Application, DrawingArea, Overflow, Overlay, Revealer, RevealerTransitionType};
use tracing::debug;

use lumen_core::{Edge, PanelSurface, Point, Size};

use crate::common::{monitor_area, panel_anchors, ExclusiveZone, LayerMargins, LayerRole, LayerWindow};

/// Reveal duration of the slide-in when the panel is shown
const SLIDE_DURATION_MS: u32 = 60;

const SLIDE_CLASSES: [&str; 4] = [
    "slide-from-left",
    "slide-from-top",
    "slide-from-right",
    "slide-from-bottom",
];

/// Layer-shell window hosting one panel.
///
/// The window holds a revealer (for the slide-in) around an overlay whose
/// base is the blur drawing area; the widget container sits on top.
pub struct GtkPanelSurface {
    window: LayerWindow,
    revealer: Revealer,
    overlay: Overlay,
    background: DrawingArea,
    size: Size,
}

impl GtkPanelSurface {
    pub fn new(app: &Application, name: &str) -> Self {
        let window = LayerWindow::new(app, LayerRole::Panel(Edge::default()));
        window.set_title(Some(name));
        window.add_css_class("lumen-panel");

        let background = DrawingArea::new();
        background.set_hexpand(true);
        background.set_vexpand(true);

        let overlay = Overlay::new();
        overlay.set_child(Some(&background));
        overlay.set_overflow(Overflow::Hidden);

        let revealer = Revealer::new();
        revealer.set_transition_duration(SLIDE_DURATION_MS);
        revealer.set_child(Some(&overlay));
        window.set_child(Some(&revealer));

        Self {
            window,
            revealer,
            overlay,
            background,
            size: Size::default(),
        }
    }

    /// Put the widget container on top of the blurred background
    pub fn set_content(&self, content: &impl IsA<gtk4::Widget>) {
        self.overlay.add_overlay(content);
    }

    /// Drawing area the blurred desktop slice is painted into
    pub fn background(&self) -> &DrawingArea {
        &self.background
    }

    pub fn set_shadow(&self, shadow: bool) {
        if shadow {
            self.window.add_css_class("panel-shadow");
        } else {
            self.window.remove_css_class("panel-shadow");
        }
    }

}

impl Drop for GtkPanelSurface {
    fn drop(&mut self) {
        self.window.close();
    }
}

impl PanelSurface for GtkPanelSurface {
    fn hide(&mut self) {
        self.revealer.set_reveal_child(false);
        self.window.hide();
    }

    fn show(&mut self) {
        self.window.show();
        self.revealer.set_reveal_child(true);
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.window.set_default_size(size.width.max(0), size.height.max(0));
    }

    fn set_maximum_size(&mut self, size: Size) {
        // GTK4 windows have no maximum size; clamp what the content may request
        self.background.set_content_width(size.width.max(0));
        self.background.set_content_height(size.height.max(0));
    }

    fn move_to(&mut self, origin: Point, edge: Edge) {
        self.window.set_anchors(&panel_anchors(edge));
        let screen = monitor_area().size();
        self.window.set_margins(LayerMargins::place(origin, self.size, screen));
    }

    fn reserve_strut(&mut self, edge: Edge, thickness: i32) {
        debug!("Reserving {}px strut on the {} edge", thickness, edge.as_str());
        self.window.set_exclusive_zone(ExclusiveZone::Fixed(thickness));
    }

    fn release_strut(&mut self) {
        self.window.set_exclusive_zone(ExclusiveZone::None);
    }

    fn set_dock_hints(&mut self) {
        // Layer surfaces never show in the task list and follow the output, not a workspace
        self.window.set_focusable(false);
    }

    fn set_slide_hint(&mut self, edge: Edge) {
        for class in SLIDE_CLASSES {
            self.window.remove_css_class(class);
        }
        self.window.add_css_class(SLIDE_CLASSES[usize::from(edge.slide_location())]);

        self.revealer.set_transition_type(match edge {
            Edge::Left => RevealerTransitionType::SlideRight,
            Edge::Top => RevealerTransitionType::SlideDown,
            Edge::Right => RevealerTransitionType::SlideLeft,
            Edge::Bottom => RevealerTransitionType::SlideUp,
        });
    }

    fn queue_repaint(&mut self) {
        self.background.queue_draw();
    }
}
