use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigPaths, ShellConfig};
use crate::messages::ShellEvent;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Service that watches shell.json for changes using inotify
pub struct ConfigWatcher {
    paths: ConfigPaths,
    event_tx: Sender<ShellEvent>,
}

impl ConfigWatcher {
    pub fn new(paths: ConfigPaths, event_tx: Sender<ShellEvent>) -> Self {
        Self { paths, event_tx }
    }

    /// Run the config watcher (blocks forever)
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting config watcher for {:?}", self.paths.shell_config);

        let dir = self.paths.config_dir();
        let _ = tokio::fs::create_dir_all(&dir).await;

        let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(32);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    for path in event.paths {
                        let _ = notify_tx.blocking_send(path);
                    }
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Watch the directory since editors often replace the file
        if dir.exists() {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            debug!("Watching directory: {:?}", dir);
        }

        let mut debounce_deadline: Option<tokio::time::Instant> = None;

        loop {
            tokio::select! {
                Some(path) = notify_rx.recv() => {
                    if path == self.paths.shell_config {
                        debounce_deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                    }
                }

                _ = async {
                    match debounce_deadline {
                        Some(deadline) => tokio::time::sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    debounce_deadline = None;
                    self.reload().await;
                }
            }
        }
    }

    async fn reload(&self) {
        let path = &self.paths.shell_config;
        debug!("Reloading shell config: {:?}", path);

        match ShellConfig::try_load(path) {
            Ok(config) => {
                info!("Shell config reloaded with {} models", config.models.len());
                let _ = self.event_tx.send(ShellEvent::ConfigReloaded(config)).await;
            }
            // Keep running on the last good config
            Err(e) => warn!("{}", e),
        }
    }
}
