use gtk4::gdk;
use gtk4::prelude::*;
use tracing::{debug, warn};

use lumen_core::{Rect, ShellEvent};

use super::ComponentContext;

const FALLBACK_AREA: Rect = Rect::new(0, 0, 1920, 1080);

/// Logical size of the first monitor.
///
/// Layer-shell margins are relative to the output minus other surfaces'
/// exclusive zones, so the monitor rectangle is the area panels lay out in.
pub fn monitor_area() -> Rect {
    let monitor = gdk::Display::default()
        .and_then(|display| display.monitors().item(0))
        .and_downcast::<gdk::Monitor>();

    match monitor {
        Some(monitor) => {
            let geometry = monitor.geometry();
            Rect::new(0, 0, geometry.width(), geometry.height())
        }
        None => {
            warn!("No monitor found, assuming {}x{}", FALLBACK_AREA.width, FALLBACK_AREA.height);
            FALLBACK_AREA
        }
    }
}

/// Report monitor hot-plugs and resolution changes as screen geometry changes
pub fn watch_monitors(ctx: &ComponentContext) {
    let Some(display) = gdk::Display::default() else {
        return;
    };
    let monitors = display.monitors();
    for monitor in monitors.iter::<gdk::Monitor>().flatten() {
        watch_geometry(&monitor, ctx);
    }

    let ctx = ctx.clone();
    monitors.connect_items_changed(move |list, position, removed, added| {
        debug!("Monitors changed (-{} +{})", removed, added);
        for index in position..position + added {
            if let Some(monitor) = list.item(index).and_downcast::<gdk::Monitor>() {
                watch_geometry(&monitor, &ctx);
            }
        }
        notify_later(&ctx);
    });
}

fn watch_geometry(monitor: &gdk::Monitor, ctx: &ComponentContext) {
    let ctx = ctx.clone();
    monitor.connect_notify_local(Some("geometry"), move |_, _| notify_later(&ctx));
}

// GDK updates monitors in batches; read the area once the batch settles
fn notify_later(ctx: &ComponentContext) {
    let ctx = ctx.clone();
    glib::idle_add_local_once(move || ctx.broadcast(ShellEvent::ScreenGeometryChanged));
}
