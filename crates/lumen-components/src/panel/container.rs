use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Orientation, Overflow, Widget};

use lumen_core::{LayoutDirection, PanelContainer, Size};

/// The GtkBox a panel lays its widgets out in.
///
/// Children stay owned by their models; the box only holds them visually.
pub struct BoxContainer {
    root: GtkBox,
    children: Vec<Widget>,
    reversed: bool,
}

impl BoxContainer {
    pub fn new() -> Self {
        let root = GtkBox::new(Orientation::Horizontal, 0);
        root.add_css_class("panel-container");
        root.set_overflow(Overflow::Hidden);
        Self {
            root,
            children: Vec::new(),
            reversed: false,
        }
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    fn insert(&mut self, widget: Widget) {
        if self.reversed {
            self.root.prepend(&widget);
        } else {
            self.root.append(&widget);
        }
        self.children.push(widget);
    }
}

impl Default for BoxContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelContainer for BoxContainer {
    type Widget = Widget;

    fn set_direction(&mut self, direction: LayoutDirection) {
        self.root.set_orientation(if direction.is_vertical() {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        });
        self.reversed = direction.is_reversed();
    }

    fn append_widget(&mut self, widget: Widget) {
        // Take the widget from wherever it was shown before
        if let Some(parent) = widget.parent() {
            match parent.downcast_ref::<GtkBox>() {
                Some(parent) => parent.remove(&widget),
                None => widget.unparent(),
            }
        }
        self.insert(widget);
    }

    fn append_stretch(&mut self) {
        let filler = GtkBox::new(Orientation::Horizontal, 0);
        filler.set_hexpand(true);
        filler.set_vexpand(true);
        filler.add_css_class("panel-stretch");
        self.insert(filler.upcast());
    }

    fn detach_all(&mut self) {
        for child in self.children.drain(..) {
            if child.parent().as_ref() == Some(self.root.upcast_ref::<Widget>()) {
                self.root.remove(&child);
            }
        }
    }

    fn fit(&mut self, size: Size) {
        self.root.set_size_request(size.width.max(0), size.height.max(0));
    }
}
