use compact_str::CompactString;
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, GestureClick, Label, Orientation, Widget};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

use lumen_core::{ConfigGroup, ControlView, LoadContext, Model, WindowControlSync, WindowManager};

const DEFAULT_ICON_SIZE: i64 = 16;

/// Title label plus minimize / maximize / close buttons
#[derive(Clone)]
pub struct GtkControlView {
    title: Label,
    minimize: Button,
    maximize: Button,
    close: Button,
}

impl GtkControlView {
    fn new() -> Self {
        let title = Label::new(None);
        title.add_css_class("winctrl-title");
        title.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        title.set_hexpand(true);
        title.set_xalign(0.0);

        let button = |icon: &str| {
            let button = Button::from_icon_name(icon);
            button.add_css_class("winctrl-button");
            button.set_focusable(false);
            button
        };

        Self {
            title,
            minimize: button("window-minimize"),
            maximize: button("window-restore"),
            close: button("window-close"),
        }
    }

    fn buttons(&self) -> [&Button; 3] {
        [&self.minimize, &self.maximize, &self.close]
    }

    fn set_icon_size(&self, size: i32) {
        for button in self.buttons() {
            if let Some(image) = button.child().and_downcast::<gtk4::Image>() {
                image.set_pixel_size(size);
            }
        }
    }
}

impl ControlView for GtkControlView {
    fn set_title(&self, title: &str) {
        self.title.set_text(title);
    }

    fn set_controls_visible(&self, visible: bool) {
        for button in self.buttons() {
            button.set_visible(visible);
        }
    }
}

/// Shared handle to the synchronizer behind one control strip
pub type SharedControls<M> = Rc<RefCell<WindowControlSync<M, GtkControlView>>>;

/// Window-control strip embeddable in a panel
pub struct WindowControlModel<M: WindowManager> {
    name: CompactString,
    root: GtkBox,
    view: GtkControlView,
    sync: SharedControls<M>,
}

impl<M: WindowManager + 'static> WindowControlModel<M> {
    pub fn new(name: &str, wm: M) -> Self {
        let view = GtkControlView::new();
        let root = GtkBox::new(Orientation::Horizontal, 2);
        root.add_css_class("winctrl");
        root.append(&view.title);
        for button in view.buttons() {
            root.append(button);
        }

        let sync = Rc::new(RefCell::new(WindowControlSync::new(wm, view.clone())));
        Self::connect_actions(&view, &sync);

        debug!("Created window controls {:?}", name);
        Self {
            name: name.into(),
            root,
            view,
            sync,
        }
    }

    pub fn controls(&self) -> SharedControls<M> {
        self.sync.clone()
    }

    fn connect_actions(view: &GtkControlView, sync: &SharedControls<M>) {
        let weak = Rc::downgrade(sync);
        view.close.connect_clicked(move |_| {
            with_controls(&weak, |sync| sync.close());
        });

        let weak = Rc::downgrade(sync);
        view.minimize.connect_clicked(move |_| {
            with_controls(&weak, |sync| sync.minimize());
        });

        let weak = Rc::downgrade(sync);
        view.maximize.connect_clicked(move |_| {
            with_controls(&weak, |sync| sync.toggle_maximize());
        });

        // Double click on the title toggles maximize
        let gesture = GestureClick::new();
        let weak = Rc::downgrade(sync);
        gesture.connect_pressed(move |_, n_press, _, _| {
            if n_press == 2 {
                with_controls(&weak, |sync| sync.title_activated());
            }
        });
        view.title.add_controller(gesture);
    }
}

fn with_controls<M: WindowManager>(
    weak: &Weak<RefCell<WindowControlSync<M, GtkControlView>>>,
    f: impl FnOnce(&mut WindowControlSync<M, GtkControlView>),
) {
    let Some(sync) = weak.upgrade() else {
        return;
    };
    match sync.try_borrow_mut() {
        Ok(mut sync) => f(&mut sync),
        Err(_) => debug!("Window controls busy, ignoring click"),
    };
}

impl<M: WindowManager + 'static> Model<Widget> for WindowControlModel<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, group: &ConfigGroup, _ctx: &LoadContext<'_, Widget>) {
        let icon_size = group.read_i64("IconSize", DEFAULT_ICON_SIZE);
        self.view.set_icon_size(i32::try_from(icon_size).unwrap_or(16));

        if let Ok(mut sync) = self.sync.try_borrow_mut() {
            let active = sync.wm().active_window();
            sync.active_window_changed(active);
        }
    }

    fn widget(&self) -> Option<Widget> {
        Some(self.root.clone().upcast())
    }
}
