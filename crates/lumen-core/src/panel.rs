use compact_str::CompactString;
use tracing::{debug, info};

use crate::blur::{BlurCompositor, BlurredLayer};
use crate::composition::{compose, Layout, PanelContainer};
use crate::config::{ConfigGroup, PanelConfig};
use crate::desktop::DesktopSurface;
use crate::geometry::{recompute_geometry, Edge, PanelGeometry, Point, Rect, Size};
use crate::model::{LoadContext, Model};
use crate::subscription::{Subscription, SubscriptionSet};

/// Top-level window a panel is drawn into
pub trait PanelSurface {
    fn hide(&mut self);

    fn show(&mut self);

    fn resize(&mut self, size: Size);

    fn set_maximum_size(&mut self, size: Size);

    /// Place the surface at `origin`, docked against `edge`
    fn move_to(&mut self, origin: Point, edge: Edge);

    /// Reserve `thickness` pixels along `edge` so maximized windows stay clear
    fn reserve_strut(&mut self, edge: Edge, thickness: i32);

    fn release_strut(&mut self);

    /// Skip the taskbar and stay on every desktop
    fn set_dock_hints(&mut self);

    fn set_slide_hint(&mut self, edge: Edge);

    fn queue_repaint(&mut self);
}

/// A screen-edge panel: geometry, composed children and blurred background
pub struct Panel<S: PanelSurface, C: PanelContainer> {
    name: CompactString,
    surface: S,
    container: C,
    config: PanelConfig,
    area: Option<Rect>,
    geometry: PanelGeometry,
    layout: Layout,
    compositor: BlurCompositor,
    subscriptions: SubscriptionSet,
    strut: Option<(Edge, i32)>,
    released: bool,
}

impl<S: PanelSurface, C: PanelContainer> Panel<S, C> {
    pub fn new(name: &str, mut surface: S, container: C) -> Self {
        surface.set_dock_hints();
        Self {
            name: name.into(),
            surface,
            container,
            config: PanelConfig::default(),
            area: None,
            geometry: PanelGeometry::default(),
            layout: Layout::new(),
            compositor: BlurCompositor::new(),
            subscriptions: SubscriptionSet::new(),
            strut: None,
            released: false,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn compositor(&self) -> &BlurCompositor {
        &self.compositor
    }

    /// Apply a new available area.
    ///
    /// Every notification runs a full recompute. The surface stays hidden
    /// until size, maximum size and position have all been applied.
    pub fn geometry_changed(&mut self, area: Rect) {
        self.surface.hide();

        self.area = Some(area);
        self.geometry = recompute_geometry(area, &self.config.request());
        let PanelGeometry { size, origin } = self.geometry;
        debug!(
            "Panel {:?} at {},{} size {}x{}",
            self.name, origin.x, origin.y, size.width, size.height
        );

        self.surface.resize(size);
        self.surface.set_maximum_size(size);
        self.surface.move_to(origin, self.config.edge);
        self.container.fit(size);
        self.update_strut();

        self.surface.set_slide_hint(self.config.edge);
        self.surface.show();
        self.surface.queue_repaint();
    }

    fn update_strut(&mut self) {
        let wanted = self
            .config
            .reserve_strut
            .then(|| (self.config.edge, self.config.edge.strut_thickness(self.geometry.size)));
        if wanted == self.strut {
            return;
        }
        match wanted {
            Some((edge, thickness)) => self.surface.reserve_strut(edge, thickness),
            None => self.surface.release_strut(),
        }
        self.strut = wanted;
    }

    /// Blurred desktop slice for the current position, or `None` when blur is off
    pub fn render_background(&mut self, desktop: &DesktopSurface) -> Option<&BlurredLayer> {
        if !self.config.blur_enabled() {
            return None;
        }
        self.compositor
            .render_background(self.geometry, desktop, self.config.blur_radius)
    }

    /// Keep `subscription` alive until the panel is released
    pub fn track(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Tear down: subscriptions first, then children, then the strut
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.subscriptions.clear();
        self.container.detach_all();
        self.layout.clear();
        if self.strut.take().is_some() {
            self.surface.release_strut();
        }
        info!("Panel {:?} released", self.name);
    }
}

impl<S: PanelSurface, C: PanelContainer> Drop for Panel<S, C> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<S: PanelSurface, C: PanelContainer> Model<C::Widget> for Panel<S, C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, group: &ConfigGroup, ctx: &LoadContext<'_, C::Widget>) {
        self.config = PanelConfig::from_group(group);
        self.compositor.invalidate();

        self.container.detach_all();
        self.geometry_changed(ctx.area);
        self.layout = compose(
            &self.config.widgets,
            self.config.direction,
            ctx.registry,
            &mut self.container,
        );
        info!(
            "Panel {:?} loaded with {} layout entries",
            self.name,
            self.layout.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{LayoutDirection, LayoutEntry};
    use crate::desktop::tests::desktop_with;
    use crate::image::Image;
    use crate::model::tests::TestModel;
    use crate::model::Registry;
    use crate::subscription::Signal;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct LogSurface(Log);

    impl PanelSurface for LogSurface {
        fn hide(&mut self) {
            self.0.borrow_mut().push("hide".into());
        }

        fn show(&mut self) {
            self.0.borrow_mut().push("show".into());
        }

        fn resize(&mut self, size: Size) {
            self.0.borrow_mut().push(format!("resize {}x{}", size.width, size.height));
        }

        fn set_maximum_size(&mut self, size: Size) {
            self.0.borrow_mut().push(format!("max {}x{}", size.width, size.height));
        }

        fn move_to(&mut self, origin: Point, _edge: Edge) {
            self.0.borrow_mut().push(format!("move {},{}", origin.x, origin.y));
        }

        fn reserve_strut(&mut self, edge: Edge, thickness: i32) {
            self.0.borrow_mut().push(format!("strut {} {}", edge.as_str(), thickness));
        }

        fn release_strut(&mut self) {
            self.0.borrow_mut().push("release strut".into());
        }

        fn set_dock_hints(&mut self) {
            self.0.borrow_mut().push("dock hints".into());
        }

        fn set_slide_hint(&mut self, edge: Edge) {
            self.0.borrow_mut().push(format!("slide {}", edge.as_str()));
        }

        fn queue_repaint(&mut self) {
            self.0.borrow_mut().push("repaint".into());
        }
    }

    struct LogContainer {
        log: Log,
        children: Vec<&'static str>,
    }

    impl PanelContainer for LogContainer {
        type Widget = &'static str;

        fn set_direction(&mut self, _direction: LayoutDirection) {}

        fn append_widget(&mut self, widget: &'static str) {
            self.children.push(widget);
        }

        fn append_stretch(&mut self) {
            self.children.push("<stretch>");
        }

        fn detach_all(&mut self) {
            self.children.clear();
            self.log.borrow_mut().push("detach".into());
        }

        fn fit(&mut self, size: Size) {
            self.log.borrow_mut().push(format!("fit {}x{}", size.width, size.height));
        }
    }

    type TestPanel = Panel<LogSurface, LogContainer>;

    fn panel(name: &str) -> (TestPanel, Log) {
        let log: Log = Rc::default();
        let container = LogContainer { log: log.clone(), children: Vec::new() };
        (Panel::new(name, LogSurface(log.clone()), container), log)
    }

    fn bottom_bar() -> ConfigGroup {
        ConfigGroup::new()
            .with("Name", "bar")
            .with("Type", "panel")
            .with("Width", "100")
            .with("Height", "40px")
            .with("Position", 3)
    }

    fn load(panel: &mut TestPanel, group: &ConfigGroup, registry: &Registry<&'static str>, area: Rect) {
        let ctx = LoadContext { registry, area };
        panel.load(group, &ctx);
    }

    #[test]
    fn test_dock_hints_set_at_creation() {
        let (_panel, log) = panel("bar");
        assert_eq!(*log.borrow(), vec!["dock hints"]);
    }

    #[test]
    fn test_hidden_until_geometry_applied() {
        let (mut panel, log) = panel("bar");
        let registry = Registry::new();
        load(&mut panel, &bottom_bar(), &registry, Rect::new(0, 0, 1000, 800));

        assert_eq!(
            log.borrow()[1..].to_vec(),
            vec![
                "detach",
                "hide",
                "resize 1000x40",
                "max 1000x40",
                "move 0,760",
                "fit 1000x40",
                "strut bottom 40",
                "slide bottom",
                "show",
                "repaint",
            ]
        );
    }

    #[test]
    fn test_repeated_geometry_change_is_idempotent() {
        let (mut panel, log) = panel("bar");
        let registry = Registry::new();
        let area = Rect::new(0, 0, 1000, 800);
        load(&mut panel, &bottom_bar(), &registry, area);
        let first = panel.geometry();

        log.borrow_mut().clear();
        panel.geometry_changed(area);
        panel.geometry_changed(area);

        assert_eq!(panel.geometry(), first);
        let log = log.borrow();
        assert_eq!(log.iter().filter(|l| l.as_str() == "hide").count(), 2);
        assert!(!log.iter().any(|l| l.starts_with("strut")));
    }

    #[test]
    fn test_geometry_follows_new_area() {
        let (mut panel, log) = panel("bar");
        let registry = Registry::new();
        load(&mut panel, &bottom_bar(), &registry, Rect::new(0, 0, 1000, 800));

        panel.geometry_changed(Rect::new(0, 0, 1920, 1080));
        assert_eq!(panel.geometry().origin, Point::new(0, 1040));
        assert_eq!(panel.geometry().size, Size::new(1920, 40));
        assert_eq!(log.borrow().iter().filter(|l| l.starts_with("strut")).count(), 1);
    }

    #[test]
    fn test_strut_disabled() {
        let (mut panel, log) = panel("bar");
        let registry = Registry::new();
        let group = bottom_bar().with("Struts", false);
        load(&mut panel, &group, &registry, Rect::new(0, 0, 1000, 800));

        drop(panel);
        assert!(!log.borrow().iter().any(|l| l.contains("strut")));
    }

    #[test]
    fn test_load_composes_widgets_and_skips_self() {
        let mut registry: Registry<&'static str> = Registry::new();
        registry.register(TestModel::visual("clock", "clock-widget"));
        let (panel, _log) = panel("bar");
        let panel = Rc::new(RefCell::new(panel));
        registry.register(panel.clone());

        let group = bottom_bar().with("Widgets", "bar, stretch, clock, ghost");
        registry.load_all(
            &crate::config::ShellConfig { models: vec![group] },
            Rect::new(0, 0, 1000, 800),
        );

        let panel = panel.borrow();
        assert_eq!(
            panel.layout().to_vec(),
            vec![LayoutEntry::Stretch, LayoutEntry::Widget("clock".into())]
        );
        assert_eq!(panel.container().children, vec!["<stretch>", "clock-widget"]);
    }

    #[test]
    fn test_reload_detaches_previous_children() {
        let mut registry: Registry<&'static str> = Registry::new();
        registry.register(TestModel::visual("clock", "clock-widget"));
        let (mut panel, _log) = panel("bar");
        let area = Rect::new(0, 0, 1000, 800);

        load(&mut panel, &bottom_bar().with("Widgets", "clock"), &registry, area);
        load(&mut panel, &bottom_bar().with("Widgets", "clock"), &registry, area);
        assert_eq!(panel.container().children, vec!["clock-widget"]);
    }

    #[test]
    fn test_blur_disabled_does_no_sampling() {
        let (mut panel, _log) = panel("bar");
        let registry = Registry::new();
        load(&mut panel, &bottom_bar(), &registry, Rect::new(0, 0, 1000, 800));

        let desktop = desktop_with(Image::filled(100, 100, 0xFF202020));
        assert!(panel.render_background(&desktop).is_none());
        assert_eq!(panel.compositor().sample_count(), 0);
    }

    #[test]
    fn test_blur_resamples_after_move() {
        let (mut panel, _log) = panel("bar");
        let registry = Registry::new();
        let group = bottom_bar().with("BlurRadius", 4);
        load(&mut panel, &group, &registry, Rect::new(0, 0, 1000, 800));

        let desktop = desktop_with(Image::filled(1000, 800, 0xFF202020));
        let source = panel.render_background(&desktop).map(|layer| layer.source);
        assert_eq!(source, Some(Rect::new(-4, 756, 1008, 48)));

        panel.geometry_changed(Rect::new(0, 0, 1000, 600));
        let source = panel.render_background(&desktop).map(|layer| layer.source);
        assert_eq!(source, Some(Rect::new(-4, 556, 1008, 48)));
        assert_eq!(panel.compositor().sample_count(), 2);
    }

    #[test]
    fn test_release_order() {
        let (mut panel, log) = panel("bar");
        let registry = Registry::new();
        load(&mut panel, &bottom_bar(), &registry, Rect::new(0, 0, 1000, 800));

        struct Guard(Log);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.borrow_mut().push("unsubscribed".into());
            }
        }

        let signal = Signal::<Rect>::new();
        let guard = Guard(log.clone());
        panel.track(signal.connect(move |_| {
            let _held = &guard;
        }));

        log.borrow_mut().clear();
        drop(panel);
        assert_eq!(*log.borrow(), vec!["unsubscribed", "detach", "release strut"]);
        assert_eq!(signal.handler_count(), 0);
    }
}
