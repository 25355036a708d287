use gtk4::prelude::*;
use gtk4::DrawingArea;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

use lumen_core::{DesktopSurface, Point, Rect};

use crate::common::{paint_image, ComponentContext, LayerRole, LayerWindow};
use crate::desktop::PixbufLoader;

/// Desktop background window drawing the shared desktop surface
pub struct DesktopComponent {
    window: LayerWindow,
    canvas: DrawingArea,
    surface: Rc<RefCell<DesktopSurface>>,
}

impl DesktopComponent {
    pub fn new(ctx: &ComponentContext, name: &str) -> Self {
        let window = LayerWindow::new(&ctx.app, LayerRole::Desktop);
        window.set_title(Some(name));
        window.add_css_class("desktop-container");

        let canvas = DrawingArea::new();
        canvas.set_hexpand(true);
        canvas.set_vexpand(true);
        window.set_child(Some(&canvas));

        let surface = Rc::new(RefCell::new(
            DesktopSurface::new(name).with_loader(Box::new(PixbufLoader)),
        ));

        let weak: Weak<RefCell<DesktopSurface>> = Rc::downgrade(&surface);
        canvas.set_draw_func(move |_, cr, _, _| {
            let Some(surface) = weak.upgrade() else {
                return;
            };
            let Ok(surface) = surface.try_borrow() else {
                return;
            };
            match surface.image() {
                Some(image) => paint_image(cr, image, Point::default()),
                None => {
                    cr.set_source_rgb(0.1, 0.1, 0.12);
                    let _ = cr.paint();
                }
            }
        });

        debug!("Created desktop {:?}", name);
        Self {
            window,
            canvas,
            surface,
        }
    }

    /// The model registered with the shell
    pub fn surface(&self) -> &Rc<RefCell<DesktopSurface>> {
        &self.surface
    }

    pub fn show(&self) {
        self.window.show();
    }

    pub fn queue_draw(&self) {
        self.canvas.queue_draw();
    }

    pub fn geometry_changed(&self, area: Rect) {
        if let Ok(mut surface) = self.surface.try_borrow_mut() {
            surface.geometry_changed(area);
        }
        self.queue_draw();
    }
}

impl Drop for DesktopComponent {
    fn drop(&mut self) {
        self.window.close();
    }
}
