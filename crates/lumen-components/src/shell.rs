use gtk4::prelude::*;
use gtk4::Widget;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use lumen_core::{
    HyprlandWindowManager, ModelKind, Rect, Registry, ShellConfig, ShellEvent, Signal,
    SubscriptionSet, WindowId, WindowProperties,
};

use crate::common::{monitor_area, ComponentContext};
use crate::desktop::DesktopComponent;
use crate::panel::{apply_style, attach_background, create_panel, GtkPanel};
use crate::winctrl::{SharedControls, WindowControlModel};

/// Every model the shell runs, plus the signals that feed them.
///
/// Events from the services arrive through [`Shell::dispatch`] on the GTK
/// thread and are re-emitted on typed signals the models subscribe to.
pub struct Shell {
    ctx: ComponentContext,
    area: Rect,
    registry: Registry<Widget>,
    desktops: Vec<Rc<DesktopComponent>>,
    panels: Vec<Rc<RefCell<GtkPanel>>>,
    controls: Vec<SharedControls<HyprlandWindowManager>>,
    geometry_changed: Signal<Rect>,
    active_window_changed: Signal<Option<WindowId>>,
    window_changed: Signal<(Option<WindowId>, WindowProperties)>,
    subscriptions: SubscriptionSet,
}

impl Shell {
    /// Create, register and load every model named in the context's config
    pub fn new(ctx: ComponentContext) -> Self {
        let mut shell = Self {
            ctx,
            area: monitor_area(),
            registry: Registry::new(),
            desktops: Vec::new(),
            panels: Vec::new(),
            controls: Vec::new(),
            geometry_changed: Signal::new(),
            active_window_changed: Signal::new(),
            window_changed: Signal::new(),
            subscriptions: SubscriptionSet::new(),
        };
        shell.build();
        shell
    }

    pub fn registry(&self) -> &Registry<Widget> {
        &self.registry
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn build(&mut self) {
        let models: Vec<(String, ModelKind)> = self
            .ctx
            .config()
            .named_models()
            .map(|(name, kind, _)| (name.to_string(), kind))
            .collect();

        for (name, kind) in models {
            match kind {
                ModelKind::Desktop => self.add_desktop(&name),
                ModelKind::Panel => self.add_panel(&name),
                ModelKind::WindowControl => self.add_window_controls(&name),
            }
        }

        info!(
            "Loading {} models for a {}x{} area",
            self.registry.len(),
            self.area.width,
            self.area.height
        );
        self.registry.load_all(&self.ctx.config.read(), self.area);

        let desktop = self.registry.desktop();
        for panel in &self.panels {
            attach_background(panel, desktop.clone());
            apply_style(&panel.borrow());
        }
        for desktop in &self.desktops {
            desktop.show();
        }
    }

    fn add_desktop(&mut self, name: &str) {
        let desktop = Rc::new(DesktopComponent::new(&self.ctx, name));
        if !self.registry.register_desktop(desktop.surface().clone()) {
            return;
        }

        let weak = Rc::downgrade(&desktop);
        self.subscriptions.push(self.geometry_changed.connect(move |area| {
            if let Some(desktop) = weak.upgrade() {
                desktop.geometry_changed(*area);
            }
        }));
        self.desktops.push(desktop);
    }

    fn add_panel(&mut self, name: &str) {
        let panel = create_panel(&self.ctx, name);
        if !self.registry.register(panel.clone()) {
            return;
        }

        let weak = Rc::downgrade(&panel);
        let subscription = self.geometry_changed.connect(move |area| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            match panel.try_borrow_mut() {
                Ok(mut panel) => panel.geometry_changed(*area),
                Err(_) => debug!("Panel busy, skipping geometry change"),
            };
        });
        panel.borrow_mut().track(subscription);
        self.panels.push(panel);
    }

    fn add_window_controls(&mut self, name: &str) {
        let model = WindowControlModel::new(name, HyprlandWindowManager::new());
        let controls = model.controls();
        if !self.registry.register(Rc::new(RefCell::new(model))) {
            return;
        }

        let weak = Rc::downgrade(&controls);
        self.subscriptions.push(self.active_window_changed.connect(move |id| {
            if let Some(controls) = weak.upgrade() {
                update_if_free(&controls, "active window change", |controls| {
                    controls.active_window_changed(id.clone())
                });
            }
        }));

        let weak = Rc::downgrade(&controls);
        self.subscriptions.push(self.window_changed.connect(move |(id, properties)| {
            if let Some(controls) = weak.upgrade() {
                update_if_free(&controls, "window change", |controls| {
                    controls.window_changed(id.as_ref(), *properties)
                });
            }
        }));
        self.controls.push(controls);
    }

    /// Handle one event from the services, on the GTK thread
    pub fn dispatch(&mut self, event: &ShellEvent) {
        debug!("Dispatching {}", event.kind());
        match event {
            ShellEvent::ActiveWindowChanged(id) => self.active_window_changed.emit(id),

            ShellEvent::WindowChanged { window, properties } => {
                self.window_changed.emit(&(window.clone(), *properties));
            }

            ShellEvent::ScreenGeometryChanged => {
                let area = monitor_area();
                info!("Screen geometry changed to {}x{}", area.width, area.height);
                self.area = area;
                self.geometry_changed.emit(&area);
            }

            ShellEvent::HyprlandConnected => info!("Window manager connected"),

            ShellEvent::HyprlandDisconnected => {
                warn!("Window manager disconnected");
                self.active_window_changed.emit(&None);
            }

            ShellEvent::ConfigReloaded(config) => self.reload(config.clone()),
        }
    }

    /// Re-run every model's load with the new config
    fn reload(&mut self, config: ShellConfig) {
        for (name, _, _) in config.named_models() {
            if self.registry.get_model_by_name(name).is_none() {
                warn!("Model {:?} is new; restart the shell to create it", name);
            }
        }

        *self.ctx.config.write() = config;
        self.registry.load_all(&self.ctx.config.read(), self.area);
        for desktop in &self.desktops {
            desktop.queue_draw();
        }
        // A new background or blur radius shows through every panel
        for panel in &self.panels {
            let panel = panel.borrow();
            apply_style(&panel);
            panel.surface().background().queue_draw();
        }
        info!("Shell config applied");
    }

    /// Tear everything down: subscriptions, then panels, then the registry
    pub fn shutdown(&mut self) {
        self.subscriptions.clear();
        for panel in self.panels.drain(..).rev() {
            panel.borrow_mut().release();
        }
        self.controls.clear();
        self.registry.clear();
        self.desktops.clear();
        info!("Shell shut down");
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run `update` on a model unless a re-entrant handler already holds it.
/// Returns whether the update ran.
fn update_if_free<T>(cell: &RefCell<T>, what: &str, update: impl FnOnce(&mut T)) -> bool {
    match cell.try_borrow_mut() {
        Ok(mut value) => {
            update(&mut value);
            true
        }
        Err(_) => {
            debug!("Window controls busy, skipping {}", what);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_skips_a_borrowed_model() {
        let cell = RefCell::new(0);
        assert!(update_if_free(&cell, "window change", |value| *value += 1));
        assert_eq!(*cell.borrow(), 1);

        let held = cell.borrow_mut();
        assert!(!update_if_free(&cell, "window change", |value| *value += 1));
        drop(held);
        assert_eq!(*cell.borrow(), 1);
    }
}
