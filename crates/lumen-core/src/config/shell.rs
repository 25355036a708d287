use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;

use super::{ConfigGroup, ModelKind};

/// Shell configuration (shell.json): one group per model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(rename = "Models", default)]
    pub models: Vec<ConfigGroup>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ConfigGroup::new().with("Name", "desktop").with("Type", "desktop"),
                ConfigGroup::new().with("Name", "winctrl").with("Type", "winctrl"),
                ConfigGroup::new()
                    .with("Name", "panel")
                    .with("Type", "panel")
                    .with("Width", "100")
                    .with("Height", "32px")
                    .with("Position", 3)
                    .with("Widgets", json!(["winctrl", "stretch"])),
            ],
        }
    }
}

impl ShellConfig {
    /// Load the config, falling back to the default shell on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("No shell config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Groups that carry both a name and a known kind, in file order
    pub fn named_models(&self) -> impl Iterator<Item = (&str, ModelKind, &ConfigGroup)> {
        self.models.iter().filter_map(|group| {
            let name = group.name()?;
            match group.kind() {
                Some(kind) => Some((name, kind, group)),
                None => {
                    warn!("Model {:?} has no known Type, skipping", name);
                    None
                }
            }
        })
    }

    /// Point the first desktop at a new background; `false` when there is no desktop
    pub fn set_background(&mut self, path: &Path) -> bool {
        let desktop = self
            .models
            .iter_mut()
            .find(|group| group.name().is_some() && group.kind() == Some(ModelKind::Desktop));
        match desktop {
            Some(group) => {
                group.set("Background", path.to_string_lossy().into_owned());
                true
            }
            None => false,
        }
    }

    pub fn group(&self, name: &str) -> Option<&ConfigGroup> {
        self.models.iter().find(|group| group.name() == Some(name))
    }
}
