use tracing::debug;

use crate::wm::{WindowId, WindowManager, WindowProperties, WindowState};

/// What the window-control strip displays
pub trait ControlView {
    fn set_title(&self, title: &str);

    /// Show or hide the minimize, maximize and close buttons together
    fn set_controls_visible(&self, visible: bool);
}

/// Snapshot of the active window as last reported by the window manager
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    NoActiveWindow,
    ActiveWindow {
        id: WindowId,
        title: String,
        maximized: bool,
    },
}

impl ControlState {
    pub fn title(&self) -> &str {
        match self {
            ControlState::NoActiveWindow => "",
            ControlState::ActiveWindow { title, .. } => title,
        }
    }

    /// Buttons are only offered while the active window is maximized
    pub fn controls_visible(&self) -> bool {
        matches!(self, ControlState::ActiveWindow { maximized: true, .. })
    }
}

/// Keeps the window-control strip in step with the active window.
///
/// Every notification re-queries the tracked window synchronously before the
/// view is touched. Queries against windows that vanished are discarded; the
/// next active-window notification corrects the display.
pub struct WindowControlSync<M, V> {
    wm: M,
    view: V,
    tracked: Option<WindowId>,
    state: ControlState,
}

impl<M: WindowManager, V: ControlView> WindowControlSync<M, V> {
    pub fn new(wm: M, view: V) -> Self {
        let sync = Self {
            wm,
            view,
            tracked: None,
            state: ControlState::NoActiveWindow,
        };
        sync.render();
        sync
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn tracked(&self) -> Option<&WindowId> {
        self.tracked.as_ref()
    }

    pub fn wm(&self) -> &M {
        &self.wm
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// The window manager focused a different window (or none)
    pub fn active_window_changed(&mut self, id: Option<WindowId>) {
        self.tracked = id;
        self.refresh();
    }

    /// Some window changed. The tracked window is re-queried, whichever window fired.
    pub fn window_changed(&mut self, id: Option<&WindowId>, properties: WindowProperties) {
        debug!("Window {:?} changed {:?}", id, properties);
        self.refresh();
    }

    /// Re-derive the snapshot for the tracked window
    pub fn refresh(&mut self) {
        let Some(id) = self.tracked.clone() else {
            self.state = ControlState::NoActiveWindow;
            self.render();
            return;
        };

        let snapshot = self
            .wm
            .window_name(&id)
            .and_then(|title| Ok((title, self.wm.window_state(&id)?)));
        match snapshot {
            Ok((title, state)) => {
                self.state = ControlState::ActiveWindow {
                    id,
                    title,
                    maximized: state.contains(WindowState::MAXIMIZED),
                };
                self.render();
            }
            Err(e) => debug!("Discarding query for window {}: {}", id, e),
        }
    }

    fn render(&self) {
        self.view.set_title(self.state.title());
        self.view.set_controls_visible(self.state.controls_visible());
    }

    /// Ask the tracked window to close
    pub fn close(&self) {
        let Some(id) = &self.tracked else {
            return;
        };
        if let Err(e) = self.wm.close_request(id) {
            debug!("Close request for {} dropped: {}", id, e);
        }
    }

    /// Minimize the tracked window, then refresh the snapshot
    pub fn minimize(&mut self) {
        if let Some(id) = &self.tracked {
            if let Err(e) = self.wm.minimize(id) {
                debug!("Minimize request for {} dropped: {}", id, e);
            }
        }
        self.refresh();
    }

    /// Flip the maximized bit of the window manager's current active window
    pub fn toggle_maximize(&self) {
        let Some(id) = self.wm.active_window() else {
            return;
        };
        let result = self.wm.window_state(&id).and_then(|state| {
            if state.contains(WindowState::MAXIMIZED) {
                self.wm.clear_state(&id, WindowState::MAXIMIZED)
            } else {
                self.wm.set_state(&id, WindowState::MAXIMIZED)
            }
        });
        if let Err(e) = result {
            debug!("Toggle maximize for {} dropped: {}", id, e);
        }
    }

    /// Double activation on the title label
    pub fn title_activated(&self) {
        self.toggle_maximize();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::WmError;
    use crate::geometry::Rect;
    use crate::wm::DesktopInfo;
    use ahash::AHashMap;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Name(String),
        State(String),
        Set(String, WindowState),
        Clear(String, WindowState),
        Minimize(String),
        Close(String),
    }

    /// In-memory window manager that logs every call
    #[derive(Default)]
    pub(crate) struct FakeWm {
        pub windows: RefCell<AHashMap<String, (String, WindowState)>>,
        pub active: RefCell<Option<WindowId>>,
        pub calls: RefCell<Vec<Call>>,
    }

    impl FakeWm {
        pub fn with_window(self, id: &str, title: &str, state: WindowState) -> Self {
            self.windows
                .borrow_mut()
                .insert(id.to_string(), (title.to_string(), state));
            self
        }

        pub fn focus(&self, id: &str) {
            *self.active.borrow_mut() = Some(WindowId::new(id));
        }

        pub fn remove(&self, id: &str) {
            self.windows.borrow_mut().remove(id);
        }

        fn lookup(&self, id: &WindowId) -> Result<(String, WindowState), WmError> {
            self.windows
                .borrow()
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| WmError::NoSuchWindow(id.0.clone()))
        }

        fn log(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl WindowManager for FakeWm {
        fn active_window(&self) -> Option<WindowId> {
            self.active.borrow().clone()
        }

        fn window_name(&self, id: &WindowId) -> Result<String, WmError> {
            self.log(Call::Name(id.to_string()));
            self.lookup(id).map(|(title, _)| title)
        }

        fn window_state(&self, id: &WindowId) -> Result<WindowState, WmError> {
            self.log(Call::State(id.to_string()));
            self.lookup(id).map(|(_, state)| state)
        }

        fn set_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError> {
            self.log(Call::Set(id.to_string(), state));
            let mut windows = self.windows.borrow_mut();
            let entry = windows
                .get_mut(id.as_str())
                .ok_or_else(|| WmError::NoSuchWindow(id.0.clone()))?;
            entry.1.insert(state);
            Ok(())
        }

        fn clear_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError> {
            self.log(Call::Clear(id.to_string(), state));
            let mut windows = self.windows.borrow_mut();
            let entry = windows
                .get_mut(id.as_str())
                .ok_or_else(|| WmError::NoSuchWindow(id.0.clone()))?;
            entry.1.remove(state);
            Ok(())
        }

        fn minimize(&self, id: &WindowId) -> Result<(), WmError> {
            self.log(Call::Minimize(id.to_string()));
            let mut windows = self.windows.borrow_mut();
            let entry = windows
                .get_mut(id.as_str())
                .ok_or_else(|| WmError::NoSuchWindow(id.0.clone()))?;
            entry.1.insert(WindowState::MINIMIZED);
            entry.1.remove(WindowState::MAXIMIZED);
            Ok(())
        }

        fn close_request(&self, id: &WindowId) -> Result<(), WmError> {
            self.log(Call::Close(id.to_string()));
            self.lookup(id).map(|_| ())
        }

        fn desktops(&self) -> Result<Vec<DesktopInfo>, WmError> {
            Ok(vec![DesktopInfo { id: 1, name: "1".into(), windows: 0 }])
        }

        fn available_area(&self) -> Result<Rect, WmError> {
            Ok(Rect::new(0, 0, 1920, 1080))
        }
    }

    /// View that remembers the last title and visibility
    #[derive(Clone, Default)]
    pub(crate) struct FakeView {
        pub title: Rc<RefCell<String>>,
        pub visible: Rc<RefCell<Option<bool>>>,
    }

    impl ControlView for FakeView {
        fn set_title(&self, title: &str) {
            *self.title.borrow_mut() = title.to_string();
        }

        fn set_controls_visible(&self, visible: bool) {
            *self.visible.borrow_mut() = Some(visible);
        }
    }

    fn setup() -> (WindowControlSync<FakeWm, FakeView>, FakeView) {
        let wm = FakeWm::default()
            .with_window("w1", "Editor", WindowState::MAXIMIZED)
            .with_window("w2", "Terminal", WindowState::empty());
        let view = FakeView::default();
        (WindowControlSync::new(wm, view.clone()), view)
    }

    #[test]
    fn test_starts_with_no_active_window() {
        let (sync, view) = setup();
        assert_eq!(sync.state(), &ControlState::NoActiveWindow);
        assert_eq!(*view.visible.borrow(), Some(false));
        assert_eq!(*view.title.borrow(), "");
    }

    #[test]
    fn test_maximized_window_shows_controls() {
        let (mut sync, view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        assert_eq!(
            sync.state(),
            &ControlState::ActiveWindow {
                id: WindowId::new("w1"),
                title: "Editor".into(),
                maximized: true,
            }
        );
        assert_eq!(*view.title.borrow(), "Editor");
        assert_eq!(*view.visible.borrow(), Some(true));

        sync.active_window_changed(Some(WindowId::new("w2")));
        assert_eq!(*view.title.borrow(), "Terminal");
        assert_eq!(*view.visible.borrow(), Some(false));
    }

    #[test]
    fn test_null_window_hides_controls() {
        let (mut sync, view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.active_window_changed(None);
        assert_eq!(sync.state(), &ControlState::NoActiveWindow);
        assert_eq!(*view.visible.borrow(), Some(false));
        assert_eq!(*view.title.borrow(), "");
    }

    #[test]
    fn test_window_changed_requeries_tracked_window() {
        let (mut sync, _view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.wm().calls.borrow_mut().clear();

        sync.window_changed(Some(&WindowId::new("w2")), WindowProperties::NAME);
        assert_eq!(
            *sync.wm().calls.borrow(),
            vec![Call::Name("w1".into()), Call::State("w1".into())]
        );
    }

    #[test]
    fn test_window_changed_picks_up_new_title() {
        let (mut sync, view) = setup();
        sync.active_window_changed(Some(WindowId::new("w2")));
        sync.wm()
            .windows
            .borrow_mut()
            .insert("w2".into(), ("Terminal - vim".into(), WindowState::MAXIMIZED));

        sync.window_changed(None, WindowProperties::NAME | WindowProperties::STATE);
        assert_eq!(*view.title.borrow(), "Terminal - vim");
        assert_eq!(*view.visible.borrow(), Some(true));
    }

    #[test]
    fn test_stale_window_is_swallowed() {
        let (mut sync, view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.wm().remove("w1");

        sync.window_changed(None, WindowProperties::STATE);
        sync.close();
        sync.minimize();

        assert_eq!(*view.title.borrow(), "Editor");
        assert!(sync.state().controls_visible());
    }

    #[test]
    fn test_close_targets_tracked_window() {
        let (mut sync, _view) = setup();
        sync.wm().focus("w2");
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.close();
        assert_eq!(sync.wm().calls.borrow().last(), Some(&Call::Close("w1".into())));
    }

    #[test]
    fn test_minimize_then_refresh() {
        let (mut sync, view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.wm().calls.borrow_mut().clear();

        sync.minimize();
        assert_eq!(
            *sync.wm().calls.borrow(),
            vec![
                Call::Minimize("w1".into()),
                Call::Name("w1".into()),
                Call::State("w1".into()),
            ]
        );
        assert_eq!(*view.visible.borrow(), Some(false));
    }

    #[test]
    fn test_toggle_maximize_uses_global_active_window() {
        let (mut sync, _view) = setup();
        sync.active_window_changed(Some(WindowId::new("w1")));
        sync.wm().focus("w2");

        sync.toggle_maximize();
        assert!(sync.wm().calls.borrow().contains(&Call::Set("w2".into(), WindowState::MAXIMIZED)));

        sync.title_activated();
        assert!(sync.wm().calls.borrow().contains(&Call::Clear("w2".into(), WindowState::MAXIMIZED)));
        assert_eq!(sync.wm().windows.borrow()["w2"].1, WindowState::empty());
    }

    #[test]
    fn test_toggle_without_active_window_does_nothing() {
        let (sync, _view) = setup();
        sync.toggle_maximize();
        assert!(sync.wm().calls.borrow().is_empty());
    }
}
