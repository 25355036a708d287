use async_channel::Sender;
use compact_str::CompactString;
use hyprland::data::{Client, Clients, Monitors, Workspaces};
use hyprland::dispatch::{
    Dispatch, DispatchType, FullscreenType, WindowIdentifier, WorkspaceIdentifierWithSpecial,
};
use hyprland::event_listener::EventListener;
use hyprland::shared::{Address, HyprData, HyprDataActiveOptional};
use smallvec::SmallVec;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::WmError;
use crate::geometry::Rect;
use crate::messages::ShellEvent;
use crate::wm::{DesktopInfo, WindowId, WindowManager, WindowProperties, WindowState};

/// Special workspace minimized windows are parked on
pub const MINIMIZED_WORKSPACE: &str = "minimized";

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Hyprland addresses show up with and without the `0x` prefix; ids never carry it
pub fn window_id(address: &Address) -> WindowId {
    let address = address.to_string();
    WindowId::new(address.trim_start_matches("0x"))
}

fn address(id: &WindowId) -> Address {
    Address::new(format!("0x{}", id.as_str()))
}

fn ipc(e: impl std::fmt::Display) -> WmError {
    WmError::Ipc(e.to_string())
}

/// Check if Hyprland is running by looking for its socket
pub fn is_hyprland_running() -> bool {
    let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") else {
        return false;
    };
    if let Ok(sig) = std::env::var("HYPRLAND_INSTANCE_SIGNATURE") {
        let socket_path = format!("{}/hypr/{}/.socket.sock", runtime_dir, sig);
        return std::path::Path::new(&socket_path).exists();
    }
    false
}

/// Async service forwarding Hyprland IPC events to the UI thread
pub struct HyprlandService {
    event_tx: Sender<ShellEvent>,
}

impl HyprlandService {
    pub fn new(event_tx: Sender<ShellEvent>) -> Self {
        Self { event_tx }
    }

    /// Main run loop: wait for the compositor, report the initial focus, then listen
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting Hyprland service");

        loop {
            if is_hyprland_running() {
                match self.try_connect().await {
                    Ok(()) => break,
                    Err(e) => warn!("Failed to connect to Hyprland: {}, retrying in 2s", e),
                }
            } else {
                warn!("Hyprland not running, waiting...");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }

        loop {
            if let Err(e) = Self::run_event_listener(self.event_tx.clone()).await {
                error!("Event listener error: {}, reconnecting...", e);
            }
            let _ = self.event_tx.send(ShellEvent::HyprlandDisconnected).await;
            tokio::time::sleep(RECONNECT_DELAY).await;
            if self.try_connect().await.is_err() {
                debug!("Hyprland still unavailable");
            }
        }
    }

    async fn try_connect(&self) -> anyhow::Result<()> {
        debug!("Syncing active window from Hyprland");
        let active = Client::get_active_async().await?;

        let _ = self.event_tx.send(ShellEvent::HyprlandConnected).await;
        let _ = self
            .event_tx
            .send(ShellEvent::ActiveWindowChanged(
                active.map(|client| window_id(&client.address)),
            ))
            .await;
        info!("Connected to Hyprland IPC");
        Ok(())
    }

    /// Run the event listener (blocks until error)
    async fn run_event_listener(tx: Sender<ShellEvent>) -> anyhow::Result<()> {
        let mut listener = EventListener::new();

        let tx1 = tx.clone();
        listener.add_active_window_change_handler(move |data| {
            let id = data.map(|data| window_id(&data.window_address));
            let _ = tx1.send_blocking(ShellEvent::ActiveWindowChanged(id));
        });

        let tx2 = tx.clone();
        listener.add_window_title_change_handler(move |addr| {
            let _ = tx2.send_blocking(ShellEvent::WindowChanged {
                window: Some(window_id(&addr)),
                properties: WindowProperties::NAME,
            });
        });

        // Fullscreen events do not name the window; the synchronizer re-queries its own
        let tx3 = tx.clone();
        listener.add_fullscreen_state_change_handler(move |_| {
            let _ = tx3.send_blocking(ShellEvent::WindowChanged {
                window: None,
                properties: WindowProperties::STATE,
            });
        });

        let tx4 = tx.clone();
        listener.add_float_state_handler(move |data| {
            let _ = tx4.send_blocking(ShellEvent::WindowChanged {
                window: Some(window_id(&data.window_address)),
                properties: WindowProperties::STATE,
            });
        });

        // Moving to special:minimized is how windows get minimized
        let tx5 = tx.clone();
        listener.add_window_moved_handler(move |data| {
            let _ = tx5.send_blocking(ShellEvent::WindowChanged {
                window: Some(window_id(&data.window_address)),
                properties: WindowProperties::DESKTOP | WindowProperties::STATE,
            });
        });

        let tx6 = tx.clone();
        listener.add_monitor_added_handler(move |name| {
            debug!("Monitor added: {}", name);
            let _ = tx6.send_blocking(ShellEvent::ScreenGeometryChanged);
        });

        let tx7 = tx.clone();
        listener.add_monitor_removed_handler(move |name| {
            debug!("Monitor removed: {}", name);
            let _ = tx7.send_blocking(ShellEvent::ScreenGeometryChanged);
        });

        debug!("Starting Hyprland event listener");
        listener.start_listener_async().await?;

        Ok(())
    }
}

/// Synchronous window-manager queries and commands over Hyprland IPC
#[derive(Debug, Default, Clone, Copy)]
pub struct HyprlandWindowManager;

impl HyprlandWindowManager {
    pub fn new() -> Self {
        Self
    }

    fn client(&self, id: &WindowId) -> Result<Client, WmError> {
        Clients::get()
            .map_err(ipc)?
            .into_iter()
            .find(|client| window_id(&client.address) == *id)
            .ok_or_else(|| WmError::NoSuchWindow(id.0.clone()))
    }

    fn dispatch(&self, dispatch: DispatchType<'_>) -> Result<(), WmError> {
        Dispatch::call(dispatch).map_err(ipc)
    }

    fn run_command(&self, id: &WindowId, command: StateCommand) -> Result<(), WmError> {
        let target = || WindowIdentifier::Address(address(id));
        match command {
            StateCommand::Park => self.dispatch(DispatchType::MoveToWorkspaceSilent(
                WorkspaceIdentifierWithSpecial::Special(Some(MINIMIZED_WORKSPACE)),
                Some(target()),
            )),
            StateCommand::Unpark => self.dispatch(DispatchType::MoveToWorkspaceSilent(
                WorkspaceIdentifierWithSpecial::Relative(0),
                Some(target()),
            )),
            StateCommand::Focus => self.dispatch(DispatchType::FocusWindow(target())),
            StateCommand::ToggleMaximize => {
                self.dispatch(DispatchType::ToggleFullscreen(FullscreenType::Maximize))
            }
            StateCommand::ToggleFullscreen => {
                self.dispatch(DispatchType::ToggleFullscreen(FullscreenType::Real))
            }
            StateCommand::ToggleFloating => self.dispatch(DispatchType::ToggleFloating(Some(target()))),
            StateCommand::TogglePin => self.dispatch(DispatchType::TogglePin),
        }
    }

    fn apply(&self, id: &WindowId, bits: WindowState, enable: bool) -> Result<(), WmError> {
        let current = state_of(&self.client(id)?);
        for command in state_commands(current, bits, enable) {
            self.run_command(id, command)?;
        }
        Ok(())
    }
}

/// One IPC dispatch of a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateCommand {
    Park,
    Unpark,
    Focus,
    ToggleMaximize,
    ToggleFullscreen,
    ToggleFloating,
    TogglePin,
}

/// Dispatches that move a window from `current` to having `bits` set or
/// cleared. Maximize, fullscreen and pin act on the focused window, so each
/// is preceded by a focus on the target.
fn state_commands(current: WindowState, bits: WindowState, enable: bool) -> SmallVec<[StateCommand; 8]> {
    let changing = if enable { bits - current } else { bits & current };
    let mut commands = SmallVec::new();

    if changing.contains(WindowState::MINIMIZED) {
        commands.push(if enable { StateCommand::Park } else { StateCommand::Unpark });
    }
    if changing.contains(WindowState::MAXIMIZED) {
        commands.extend([StateCommand::Focus, StateCommand::ToggleMaximize]);
    }
    if changing.contains(WindowState::FULLSCREEN) {
        commands.extend([StateCommand::Focus, StateCommand::ToggleFullscreen]);
    }
    if changing.contains(WindowState::FLOATING) {
        commands.push(StateCommand::ToggleFloating);
    }
    if changing.contains(WindowState::PINNED) {
        commands.extend([StateCommand::Focus, StateCommand::TogglePin]);
    }
    commands
}

/// Hyprland reports fullscreen mode 1 for maximized windows
fn state_of(client: &Client) -> WindowState {
    let mut state = WindowState::empty();
    if client.fullscreen {
        match client.fullscreen_mode {
            1 => state |= WindowState::MAXIMIZED,
            _ => state |= WindowState::FULLSCREEN,
        }
    }
    if client.floating {
        state |= WindowState::FLOATING;
    }
    if client.pinned {
        state |= WindowState::PINNED;
    }
    if client.workspace.name == format!("special:{}", MINIMIZED_WORKSPACE) {
        state |= WindowState::MINIMIZED;
    }
    state
}

impl WindowManager for HyprlandWindowManager {
    fn active_window(&self) -> Option<WindowId> {
        match Client::get_active() {
            Ok(client) => client.map(|client| window_id(&client.address)),
            Err(e) => {
                debug!("Active window query failed: {}", e);
                None
            }
        }
    }

    fn window_name(&self, id: &WindowId) -> Result<String, WmError> {
        self.client(id).map(|client| client.title)
    }

    fn window_state(&self, id: &WindowId) -> Result<WindowState, WmError> {
        self.client(id).map(|client| state_of(&client))
    }

    fn set_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError> {
        self.apply(id, state, true)
    }

    fn clear_state(&self, id: &WindowId, state: WindowState) -> Result<(), WmError> {
        self.apply(id, state, false)
    }

    fn minimize(&self, id: &WindowId) -> Result<(), WmError> {
        debug!("Minimizing window: {}", id);
        self.dispatch(DispatchType::MoveToWorkspaceSilent(
            WorkspaceIdentifierWithSpecial::Special(Some(MINIMIZED_WORKSPACE)),
            Some(WindowIdentifier::Address(address(id))),
        ))
    }

    fn close_request(&self, id: &WindowId) -> Result<(), WmError> {
        debug!("Closing window: {}", id);
        self.client(id)?;
        self.dispatch(DispatchType::CloseWindow(WindowIdentifier::Address(address(id))))
    }

    fn desktops(&self) -> Result<Vec<DesktopInfo>, WmError> {
        let mut desktops: Vec<DesktopInfo> = Workspaces::get()
            .map_err(ipc)?
            .into_iter()
            .filter(|ws| !ws.name.starts_with("special:"))
            .map(|ws| DesktopInfo {
                id: ws.id,
                name: CompactString::from(ws.name.as_str()),
                windows: u32::from(ws.windows),
            })
            .collect();
        desktops.sort_by_key(|desktop| desktop.id);
        Ok(desktops)
    }

    fn available_area(&self) -> Result<Rect, WmError> {
        let monitors = Monitors::get().map_err(ipc)?;
        let monitor = monitors
            .into_iter()
            .max_by_key(|monitor| monitor.focused)
            .ok_or_else(|| WmError::Ipc("no monitors reported".into()))?;

        let scale = if monitor.scale > 0.0 { f64::from(monitor.scale) } else { 1.0 };
        let width = (f64::from(monitor.width) / scale) as i32;
        let height = (f64::from(monitor.height) / scale) as i32;
        let (left, top, right, bottom) = monitor.reserved;
        let (left, top, right, bottom) =
            (i32::from(left), i32::from(top), i32::from(right), i32::from(bottom));

        Ok(Rect::new(
            left,
            top,
            width - left - right,
            height - top - bottom,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_id_drops_hex_prefix() {
        assert_eq!(window_id(&Address::new("0x55d1c0ffee")), WindowId::new("55d1c0ffee"));
        assert_eq!(window_id(&Address::new("55d1c0ffee")), WindowId::new("55d1c0ffee"));
        assert_eq!(address(&WindowId::new("abc")).to_string(), "0xabc");
    }

    #[test]
    fn test_pin_focuses_target_first() {
        let commands = state_commands(WindowState::empty(), WindowState::PINNED, true);
        assert_eq!(commands.as_slice(), &[StateCommand::Focus, StateCommand::TogglePin]);

        let commands = state_commands(WindowState::PINNED, WindowState::PINNED, false);
        assert_eq!(commands.as_slice(), &[StateCommand::Focus, StateCommand::TogglePin]);
    }

    #[test]
    fn test_only_changing_bits_dispatch() {
        assert!(state_commands(WindowState::PINNED, WindowState::PINNED, true).is_empty());
        assert!(state_commands(WindowState::empty(), WindowState::MAXIMIZED, false).is_empty());

        let commands = state_commands(
            WindowState::FLOATING,
            WindowState::MINIMIZED | WindowState::MAXIMIZED | WindowState::FLOATING,
            true,
        );
        assert_eq!(
            commands.as_slice(),
            &[StateCommand::Park, StateCommand::Focus, StateCommand::ToggleMaximize]
        );
        let commands = state_commands(WindowState::MINIMIZED, WindowState::MINIMIZED, false);
        assert_eq!(commands.as_slice(), &[StateCommand::Unpark]);
    }
}
