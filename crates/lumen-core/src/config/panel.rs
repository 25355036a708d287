use crate::composition::LayoutDirection;
use crate::geometry::{Dimension, Edge, Offsets, PanelRequest};

use super::ConfigGroup;

/// Panel settings read from a panel's config group
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub width: String,
    pub height: String,
    pub edge: Edge,
    /// Radius of the background blur, 0 disables it
    pub blur_radius: f64,
    pub display_shadow: bool,
    pub icon_size: i32,
    pub offsets: Offsets,
    pub reserve_strut: bool,
    pub direction: LayoutDirection,
    /// Widget names in layout order; `stretch` inserts a filler
    pub widgets: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::from_group(&ConfigGroup::default())
    }
}

impl PanelConfig {
    pub fn from_group(group: &ConfigGroup) -> Self {
        Self {
            width: group.read_string("Width", "100"),
            height: group.read_string("Height", "2"),
            edge: Edge::from_index(group.read_i64("Position", 0)),
            blur_radius: group.read_f64("BlurRadius", 0.0),
            display_shadow: group.read_bool("DisplayShadow", true),
            icon_size: i32::try_from(group.read_i64("IconSize", 24)).unwrap_or(24),
            offsets: Offsets {
                top: group.read_f64("OffsetTop", 0.0),
                left: group.read_f64("OffsetLeft", 0.0),
                right: group.read_f64("OffsetRight", 0.0),
                bottom: group.read_f64("OffsetBottom", 0.0),
            },
            reserve_strut: group.read_bool("Struts", true),
            direction: LayoutDirection::from_index(group.read_i64("Direction", 0)),
            widgets: group.read_list("Widgets"),
        }
    }

    /// Geometry inputs for the engine
    pub fn request(&self) -> PanelRequest {
        PanelRequest {
            width: Dimension::parse(&self.width),
            height: Dimension::parse(&self.height),
            edge: self.edge,
            offsets: self.offsets,
        }
    }

    pub fn blur_enabled(&self) -> bool {
        self.blur_radius > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.width, "100");
        assert_eq!(config.height, "2");
        assert_eq!(config.edge, Edge::Left);
        assert_eq!(config.blur_radius, 0.0);
        assert!(config.display_shadow);
        assert_eq!(config.icon_size, 24);
        assert_eq!(config.offsets, Offsets::default());
        assert!(config.reserve_strut);
        assert_eq!(config.direction, LayoutDirection::LeftToRight);
        assert!(config.widgets.is_empty());
        assert!(!config.blur_enabled());
    }

    #[test]
    fn test_reads_every_key() {
        let group = ConfigGroup::new()
            .with("Width", "640px")
            .with("Height", 5)
            .with("Position", 2)
            .with("BlurRadius", 12)
            .with("DisplayShadow", false)
            .with("IconSize", 32)
            .with("OffsetTop", 1.5)
            .with("OffsetLeft", 2)
            .with("OffsetRight", "3")
            .with("OffsetBottom", 4.0)
            .with("Struts", false)
            .with("Direction", 2)
            .with("Widgets", json!(["winctrl", "stretch", "clock"]));

        let config = PanelConfig::from_group(&group);
        assert_eq!(config.edge, Edge::Right);
        assert_eq!(config.blur_radius, 12.0);
        assert!(config.blur_enabled());
        assert!(!config.display_shadow);
        assert_eq!(config.icon_size, 32);
        assert_eq!(
            config.offsets,
            Offsets { top: 1.5, left: 2.0, right: 3.0, bottom: 4.0 }
        );
        assert!(!config.reserve_strut);
        assert_eq!(config.direction, LayoutDirection::TopToBottom);
        assert_eq!(config.widgets, vec!["winctrl", "stretch", "clock"]);

        let request = config.request();
        assert_eq!(request.width, Dimension::Pixels(640));
        assert_eq!(request.height, Dimension::Percent(5.0));
    }

    #[test]
    fn test_out_of_range_icon_size_falls_back() {
        let group = ConfigGroup::new().with("IconSize", 10_000_000_000i64);
        assert_eq!(PanelConfig::from_group(&group).icon_size, 24);

        let group = ConfigGroup::new().with("IconSize", -10_000_000_000i64);
        assert_eq!(PanelConfig::from_group(&group).icon_size, 24);
    }
}
