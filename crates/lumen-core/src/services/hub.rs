use async_channel::{Sender, TrySendError};
use std::future::Future;
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, error, info, warn};

use crate::config::ConfigPaths;
use crate::messages::ShellEvent;
use super::{ConfigWatcher, HyprlandService};

/// Events queued before the UI drains them; posts beyond this wait on the runtime
const EVENT_BACKLOG: usize = 64;

/// Owns the tokio runtime the background services run on and the channel
/// their events reach the UI thread through
pub struct ServiceHub {
    runtime: Runtime,
    events: (async_channel::Sender<ShellEvent>, async_channel::Receiver<ShellEvent>),
}

impl ServiceHub {
    /// Start the runtime plus the Hyprland listener and the config watcher
    pub fn new(paths: ConfigPaths) -> anyhow::Result<Self> {
        let hub = Self {
            runtime: Runtime::new()?,
            events: async_channel::bounded(EVENT_BACKLOG),
        };

        hub.spawn("Hyprland listener", HyprlandService::new(hub.events.0.clone()).run());
        hub.spawn("Config watcher", ConfigWatcher::new(paths, hub.events.0.clone()).run());

        info!("Services started");
        Ok(hub)
    }

    fn spawn<F>(&self, name: &'static str, service: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.runtime.spawn(async move {
            match service.await {
                Ok(()) => info!("{} stopped", name),
                Err(e) => error!("{} failed: {:#}", name, e),
            }
        });
    }

    /// Receiver drained on the GTK main loop
    pub fn event_receiver(&self) -> async_channel::Receiver<ShellEvent> {
        self.events.1.clone()
    }

    /// Make the runtime current so GTK-side code can reach tokio
    pub fn enter_runtime(&self) -> tokio::runtime::EnterGuard<'_> {
        self.runtime.enter()
    }

    /// Queue an event from the UI thread, e.g. a monitor change
    pub fn broadcast_event(&self, event: ShellEvent) {
        post(&self.events.0, self.runtime.handle(), event);
    }
}

/// Queue `event` without blocking the caller. With the backlog full the send
/// moves onto the runtime, so the event arrives late rather than never.
fn post(tx: &Sender<ShellEvent>, runtime: &Handle, event: ShellEvent) {
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            debug!("Event backlog full, deferring {}", event.kind());
            let tx = tx.clone();
            runtime.spawn(async move {
                if let Err(e) = tx.send(event).await {
                    warn!("Dropping event: {}", e);
                }
            });
        }
        Err(TrySendError::Closed(event)) => warn!("Dropping {}: channel closed", event.kind()),
    }
}
