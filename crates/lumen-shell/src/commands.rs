use anyhow::Context;
use std::path::Path;

use lumen_core::{
    recompute_geometry, ConfigPaths, HyprlandWindowManager, ModelKind, PanelConfig, Rect,
    ShellConfig, WindowManager,
};

/// Print the active window, its state and the desktops
pub fn status() -> anyhow::Result<()> {
    if !lumen_core::services::is_hyprland_running() {
        anyhow::bail!("Hyprland is not running");
    }
    let wm = HyprlandWindowManager::new();

    match wm.active_window() {
        Some(id) => {
            let title = wm.window_name(&id)?;
            let state = wm.window_state(&id)?;
            println!("Active window: {} {:?}", id, title);
            println!("State: {:?}", state);
        }
        None => println!("Active window: none"),
    }

    let area = wm.available_area()?;
    println!(
        "Available area: {}x{} at ({}, {})",
        area.width, area.height, area.x, area.y
    );

    println!("Desktops:");
    for desktop in wm.desktops()? {
        println!("  {:>3} {:<16} {} windows", desktop.id, desktop.name, desktop.windows);
    }
    Ok(())
}

/// Print every configured panel's resolved size and origin
pub fn geometry(paths: &ConfigPaths, width: Option<i32>, height: Option<i32>) -> anyhow::Result<()> {
    let area = match (width, height) {
        (Some(width), Some(height)) => Rect::new(0, 0, width, height),
        _ => HyprlandWindowManager::new()
            .available_area()
            .context("Pass --width and --height when Hyprland is not running")?,
    };

    let config = ShellConfig::load(&paths.shell_config);
    println!("Area: {}x{}", area.width, area.height);

    for (name, kind, group) in config.named_models() {
        if kind != ModelKind::Panel {
            continue;
        }
        let panel = PanelConfig::from_group(group);
        let geometry = recompute_geometry(area, &panel.request());
        println!(
            "{:<16} {:>6} {}x{} at ({}, {})",
            name,
            panel.edge.as_str(),
            geometry.size.width,
            geometry.size.height,
            geometry.origin.x,
            geometry.origin.y
        );
    }
    Ok(())
}

/// Write a new desktop background into the shell config
pub fn background(paths: &ConfigPaths, image: &Path) -> anyhow::Result<()> {
    let image = image
        .canonicalize()
        .with_context(|| format!("Cannot read {}", image.display()))?;

    let mut config = ShellConfig::load(&paths.shell_config);
    if !config.set_background(&image) {
        anyhow::bail!("{} has no desktop model", paths.shell_config.display());
    }
    config.save(&paths.shell_config)?;

    println!("Background set to {}", image.display());
    Ok(())
}
