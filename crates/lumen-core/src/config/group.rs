use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of model a config group describes, taken from its `Type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Panel,
    Desktop,
    WindowControl,
}

impl ModelKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "panel" => Some(Self::Panel),
            "desktop" => Some(Self::Desktop),
            "winctrl" | "window-control" | "windowcontrol" => Some(Self::WindowControl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::Desktop => "desktop",
            Self::WindowControl => "winctrl",
        }
    }
}

/// A string-keyed group of config entries.
///
/// Readers never fail: a missing key or a value of the wrong shape yields the
/// caller's default. Numbers and strings are coerced into each other so `"100"`
/// and `100` read the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigGroup {
    entries: Map<String, Value>,
}

impl ConfigGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The group's model name (`Name` key)
    pub fn name(&self) -> Option<&str> {
        self.entries.get("Name").and_then(Value::as_str)
    }

    /// The group's model kind (`Type` key)
    pub fn kind(&self) -> Option<ModelKind> {
        self.entries
            .get("Type")
            .and_then(Value::as_str)
            .and_then(ModelKind::from_str)
    }

    pub fn read_string(&self, key: &str, default: &str) -> String {
        match self.entries.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn read_f64(&self, key: &str, default: f64) -> f64 {
        match self.entries.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn read_i64(&self, key: &str, default: i64) -> i64 {
        match self.entries.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(default)
            }
            Some(Value::Bool(b)) => i64::from(*b),
            _ => default,
        }
    }

    pub fn read_bool(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Read an ordered list. Accepts a JSON array or a comma-separated string.
    pub fn read_list(&self, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_use_defaults() {
        let group = ConfigGroup::new();
        assert_eq!(group.read_string("Width", "100"), "100");
        assert_eq!(group.read_i64("IconSize", 24), 24);
        assert_eq!(group.read_f64("OffsetTop", 0.0), 0.0);
        assert!(group.read_bool("Struts", true));
        assert!(group.read_list("Widgets").is_empty());
    }

    #[test]
    fn test_numbers_and_strings_coerce() {
        let group = ConfigGroup::new()
            .with("Width", 50)
            .with("Height", "30px")
            .with("IconSize", "32")
            .with("OffsetLeft", "2.5")
            .with("Position", 2.0)
            .with("DisplayShadow", "no");

        assert_eq!(group.read_string("Width", "100"), "50");
        assert_eq!(group.read_string("Height", "2"), "30px");
        assert_eq!(group.read_i64("IconSize", 24), 32);
        assert_eq!(group.read_f64("OffsetLeft", 0.0), 2.5);
        assert_eq!(group.read_i64("Position", 0), 2);
        assert!(!group.read_bool("DisplayShadow", true));
    }

    #[test]
    fn test_wrong_shapes_fall_back() {
        let group = ConfigGroup::new()
            .with("IconSize", json!({"nested": true}))
            .with("Struts", "maybe")
            .with("OffsetTop", "north");

        assert_eq!(group.read_i64("IconSize", 24), 24);
        assert!(group.read_bool("Struts", true));
        assert_eq!(group.read_f64("OffsetTop", 0.0), 0.0);
    }

    #[test]
    fn test_read_list_forms() {
        let group = ConfigGroup::new()
            .with("Widgets", json!(["clock", "stretch", 7, null]))
            .with("Legacy", "a, stretch ,b,,");

        assert_eq!(group.read_list("Widgets"), vec!["clock", "stretch", "7"]);
        assert_eq!(group.read_list("Legacy"), vec!["a", "stretch", "b"]);
    }

    #[test]
    fn test_name_and_kind() {
        let group: ConfigGroup =
            serde_json::from_value(json!({"Name": "top", "Type": "Panel"})).unwrap();
        assert_eq!(group.name(), Some("top"));
        assert_eq!(group.kind(), Some(ModelKind::Panel));

        let unknown = ConfigGroup::new().with("Type", "clock");
        assert_eq!(unknown.kind(), None);
        assert_eq!(ModelKind::from_str("window-control"), Some(ModelKind::WindowControl));
    }
}
