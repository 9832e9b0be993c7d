//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// A single native menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemConfig {
    /// Action identifier the item dispatches
    pub id: String,
    /// Display title
    pub title: String,
    /// Keyboard shortcut, e.g. "CmdOrCtrl+O"
    #[serde(default)]
    pub accelerator: Option<String>,
    /// Initial check state; makes the item checkable when set
    #[serde(default)]
    pub checked: Option<bool>,
}

/// A top-level menu (File, View, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSectionConfig {
    pub title: String,
    #[serde(default)]
    pub items: Vec<MenuItemConfig>,
}

/// Native menu bar layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_sections")]
    pub sections: Vec<MenuSectionConfig>,
}

fn default_sections() -> Vec<MenuSectionConfig> {
    vec![
        MenuSectionConfig {
            title: "File".to_string(),
            items: vec![MenuItemConfig {
                id: "openFile".to_string(),
                title: "Open...".to_string(),
                accelerator: Some("CmdOrCtrl+O".to_string()),
                checked: None,
            }],
        },
        MenuSectionConfig {
            title: "View".to_string(),
            items: vec![MenuItemConfig {
                id: "toggleSidebar".to_string(),
                title: "Show Sidebar".to_string(),
                accelerator: Some("CmdOrCtrl+Shift+S".to_string()),
                checked: Some(false),
            }],
        },
    ]
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
        }
    }
}

impl MenuConfig {
    /// Every configured item, in menu order
    pub fn items(&self) -> impl Iterator<Item = &MenuItemConfig> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }
}

/// Document-open configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Extensions offered by the open-file dialog
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub documents: DocumentConfig,
}

impl Config {
    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "bergen", "Bergen")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the default configuration embedded in the binary
    pub fn default_config_str() -> &'static str {
        include_str!("../../config/default.toml")
    }
}
