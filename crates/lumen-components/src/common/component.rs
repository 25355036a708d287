use std::sync::Arc;
use gtk4::Application;
use parking_lot::RwLock;

use lumen_core::{ConfigPaths, ServiceHub, ShellConfig, ShellEvent};

/// Context shared by every component the shell builds
#[derive(Clone)]
pub struct ComponentContext {
    /// GTK application reference
    pub app: Application,
    /// Shell configuration currently applied
    pub config: Arc<RwLock<ShellConfig>>,
    /// Configuration paths
    pub paths: ConfigPaths,
    /// Service hub reference
    pub services: Arc<ServiceHub>,
}

impl ComponentContext {
    pub fn new(
        app: &Application,
        services: &Arc<ServiceHub>,
        config: Arc<RwLock<ShellConfig>>,
        paths: ConfigPaths,
    ) -> Self {
        Self {
            app: app.clone(),
            config,
            paths,
            services: services.clone(),
        }
    }

    /// Event receiver drained by the daemon loop
    pub fn event_receiver(&self) -> async_channel::Receiver<ShellEvent> {
        self.services.event_receiver()
    }

    /// Snapshot of the current shell configuration
    pub fn config(&self) -> ShellConfig {
        self.config.read().clone()
    }

    /// Queue an event for the daemon loop
    pub fn broadcast(&self, event: ShellEvent) {
        self.services.broadcast_event(event);
    }
}
