//! Tool configuration management.
//!
//! Configuration is stored as TOML at
//! `~/.config/zladxhd-installer/shortcuts.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use zladxhd_steam::Paths;

/// Shortcut tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam base directory (`~` is expanded).
    #[serde(default = "default_steam_dir")]
    pub steam_dir: String,

    /// Steam user to operate on when more than one exists.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Display name used by `add` when none is given.
    #[serde(default = "default_shortcut_name")]
    pub shortcut_name: String,
}

fn default_steam_dir() -> String {
    "~/.steam/steam".into()
}

fn default_shortcut_name() -> String {
    "Zelda: Link's Awakening DX HD".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_dir: default_steam_dir(),
            user_id: None,
            shortcut_name: default_shortcut_name(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Loads configuration from `path`, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Steam directory layout rooted at the configured base directory.
    pub fn steam_paths(&self) -> Paths {
        Paths::with_base(expand_home(&self.steam_dir))
    }
}

/// Returns the configuration file path.
pub fn config_path() -> PathBuf {
    home_dir()
        .join(".config")
        .join("zladxhd-installer")
        .join("shortcuts.toml")
}

/// Expands `~` prefix to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.steam_dir, "~/.steam/steam");
        assert!(config.user_id.is_none());
        assert_eq!(config.shortcut_name, "Zelda: Link's Awakening DX HD");
    }

    #[test]
    fn config_partial_toml() {
        // Only specify the user, rest should use defaults.
        let config: Config = toml::from_str(r#"user_id = "12345""#).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("12345"));
        assert_eq!(config.steam_dir, "~/.steam/steam");
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("shortcuts.toml");

        let config = Config {
            steam_dir: "/opt/steam".into(),
            user_id: Some("67890".into()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn load_missing_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shortcuts.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_malformed_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shortcuts.toml");
        std::fs::write(&path, "steam_dir = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn expand_home_variants() {
        assert_eq!(expand_home("/abs/steam"), PathBuf::from("/abs/steam"));
        assert_eq!(expand_home("~/steam"), home_dir().join("steam"));
        assert_eq!(expand_home("~"), home_dir());
    }

    #[test]
    fn steam_paths_use_configured_dir() {
        let config = Config {
            steam_dir: "/opt/steam".into(),
            ..Config::default()
        };
        assert_eq!(
            config.steam_paths().shortcuts_path("1"),
            PathBuf::from("/opt/steam/userdata/1/config/shortcuts.vdf")
        );
    }

    #[test]
    fn config_path_not_empty() {
        assert!(config_path().to_string_lossy().contains("zladxhd-installer"));
    }
}
