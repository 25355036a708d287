use std::path::{Path, PathBuf};

/// Configuration paths for the shell
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub shell_config: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));

        Self {
            shell_config: config_dir.join("lumen/shell.json"),
        }
    }

    /// Use an explicit shell config file instead of the XDG default
    pub fn with_shell_config(path: impl Into<PathBuf>) -> Self {
        Self {
            shell_config: path.into(),
        }
    }

    /// Directory holding the shell config, watched for live reloads
    pub fn config_dir(&self) -> PathBuf {
        self.shell_config
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}
