use gtk4::gdk::Display;
use gtk4::CssProvider;
use tracing::debug;

/// CSS theme for every Lumen surface
pub const SHELL_CSS: &str = r#"
/* ========== Panel Styles ========== */

window.lumen-panel {
    background-color: transparent;
}

window.lumen-panel.panel-shadow {
    box-shadow: 0 0 8px rgba(0, 0, 0, 0.45);
}

.panel-container {
    padding: 0 4px;
}

/* ========== Slide-in Hints ========== */

window.slide-from-left > revealer,
window.slide-from-top > revealer,
window.slide-from-right > revealer,
window.slide-from-bottom > revealer {
    transition: opacity 60ms ease-out;
}

window.slide-from-left .panel-container { border-right: 1px solid rgba(255, 255, 255, 0.08); }
window.slide-from-right .panel-container { border-left: 1px solid rgba(255, 255, 255, 0.08); }
window.slide-from-top .panel-container { border-bottom: 1px solid rgba(255, 255, 255, 0.08); }
window.slide-from-bottom .panel-container { border-top: 1px solid rgba(255, 255, 255, 0.08); }

/* ========== Window Controls ========== */

.winctrl {
    margin: 2px 6px;
}

.winctrl-title {
    color: rgba(255, 255, 255, 0.9);
    font-weight: 500;
    padding: 0 6px;
}

.winctrl-button {
    background: transparent;
    border: none;
    border-radius: 6px;
    min-width: 24px;
    min-height: 24px;
    padding: 2px;
}

.winctrl-button:hover {
    background: rgba(255, 255, 255, 0.15);
}

.winctrl-button:active {
    background: rgba(255, 255, 255, 0.25);
}

/* ========== Desktop Styles ========== */

window.desktop-container {
    background-color: #1a1a1f;
}
"#;

/// Install the shell CSS on the default display
pub fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(SHELL_CSS);

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        debug!("CSS theme loaded");
    }
}
