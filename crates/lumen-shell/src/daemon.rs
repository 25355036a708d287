use parking_lot::RwLock;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use gtk4::prelude::*;
use gtk4::Application;
use tracing::{debug, info};

use lumen_components::common::watch_monitors;
use lumen_components::{load_css, ComponentContext, Shell};
use lumen_core::{ConfigPaths, ServiceHub, ShellConfig};

const APP_ID: &str = "org.lumen.shell";

/// Run the shell daemon
pub fn run(paths: ConfigPaths) -> anyhow::Result<()> {
    info!("Initializing Lumen Shell daemon");

    // Create service hub (starts tokio runtime and services)
    let services = Arc::new(ServiceHub::new(paths.clone())?);
    let _guard = services.enter_runtime();

    let config = Arc::new(RwLock::new(ShellConfig::load(&paths.shell_config)));

    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    let shell: Rc<RefCell<Option<Shell>>> = Rc::new(RefCell::new(None));

    let services_clone = services.clone();
    let shell_on_activate = shell.clone();
    app.connect_activate(move |app| {
        if shell_on_activate.borrow().is_some() {
            debug!("Shell already active");
            return;
        }

        load_css();

        let ctx = ComponentContext::new(app, &services_clone, config.clone(), paths.clone());
        watch_monitors(&ctx);
        let event_rx = ctx.event_receiver();

        *shell_on_activate.borrow_mut() = Some(Shell::new(ctx));

        let shell = shell_on_activate.clone();
        glib::spawn_future_local(async move {
            while let Ok(event) = event_rx.recv().await {
                let Ok(mut shell) = shell.try_borrow_mut() else {
                    debug!("Shell busy, dropping {}", event.kind());
                    continue;
                };
                match shell.as_mut() {
                    Some(shell) => shell.dispatch(&event),
                    None => break,
                }
            }
        });

        info!("Lumen Shell daemon activated");
    });

    let shell_on_shutdown = shell.clone();
    app.connect_shutdown(move |_| {
        // Release panels and their struts before GTK tears the windows down
        shell_on_shutdown.borrow_mut().take();
    });

    // Arguments belong to clap, not GApplication
    let exit_code = app.run_with_args::<&str>(&[]);

    info!("Lumen Shell daemon exiting");

    std::process::exit(exit_code.into());
}
