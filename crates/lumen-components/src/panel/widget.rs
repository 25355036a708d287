use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

use lumen_core::{DesktopSurface, Panel};

use crate::common::{paint_image, ComponentContext};
use crate::panel::{BoxContainer, GtkPanelSurface};

/// A panel backed by a layer-shell window and a GtkBox
pub type GtkPanel = Panel<GtkPanelSurface, BoxContainer>;

/// Build a panel window. Geometry and children arrive with the first load.
pub fn create_panel(ctx: &ComponentContext, name: &str) -> Rc<RefCell<GtkPanel>> {
    let surface = GtkPanelSurface::new(&ctx.app, name);
    let container = BoxContainer::new();
    surface.set_content(container.widget());

    debug!("Created panel {:?}", name);
    Rc::new(RefCell::new(Panel::new(name, surface, container)))
}

/// Paint the blurred desktop behind the panel on every repaint
pub fn attach_background(panel: &Rc<RefCell<GtkPanel>>, desktop: Option<Rc<RefCell<DesktopSurface>>>) {
    let Some(desktop) = desktop else {
        debug!("No desktop registered, panel background stays transparent");
        return;
    };
    let weak: Weak<RefCell<GtkPanel>> = Rc::downgrade(panel);
    let desktop = Rc::downgrade(&desktop);

    panel
        .borrow()
        .surface()
        .background()
        .set_draw_func(move |_, cr, _, _| {
            let (Some(panel), Some(desktop)) = (weak.upgrade(), desktop.upgrade()) else {
                return;
            };
            let (Ok(mut panel), Ok(desktop)) = (panel.try_borrow_mut(), desktop.try_borrow()) else {
                return;
            };
            if let Some(layer) = panel.render_background(&desktop) {
                paint_image(cr, &layer.image, layer.offset);
            }
        });
}

/// Settings that only the GTK side acts on
pub fn apply_style(panel: &GtkPanel) {
    panel.surface().set_shadow(panel.config().display_shadow);
    panel
        .container()
        .widget()
        .set_spacing((panel.config().icon_size / 6).max(0));
}
