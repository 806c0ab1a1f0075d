use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hall: HallConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Seat grid geometry. The default 4×8 hall gives the classic 32-seat demo
/// grid; both dimensions can be overridden per install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallConfig {
    #[serde(default = "default_rows")]
    pub rows: u8,
    #[serde(default = "default_seats_per_row")]
    pub seats_per_row: u8,
}

/// Catalog source — a local TOML file with `[[movie]]` / `[[showtime]]`
/// tables. Seeded with the demo catalog on first run if missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_toml")]
    pub catalog_toml: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the keybindings footer bar on startup.
    #[serde(default = "default_show_keys_bar")]
    pub show_keys_bar: bool,
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            seats_per_row: default_seats_per_row(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_toml: default_catalog_toml(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_keys_bar: default_show_keys_bar(),
        }
    }
}

fn default_rows() -> u8 {
    4
}

fn default_seats_per_row() -> u8 {
    8
}

fn default_catalog_toml() -> PathBuf {
    // On Windows, check for a portable catalog.toml in the executable directory
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_catalog = exe_dir.join("catalog.toml");
                if portable_catalog.exists() {
                    return portable_catalog;
                }
            }
        }
    }

    platform::config_dir().join("catalog.toml")
}

fn default_show_keys_bar() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hall: HallConfig::default(),
            catalog: CatalogConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hall.rows, 4);
        assert_eq!(config.hall.seats_per_row, 8);
        assert!(config.ui.show_keys_bar);
        assert!(config.catalog.catalog_toml.ends_with("catalog.toml"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[hall]\nrows = 6\n").unwrap();
        assert_eq!(config.hall.rows, 6);
        assert_eq!(config.hall.seats_per_row, 8);
        assert!(config.ui.show_keys_bar);
    }
}
