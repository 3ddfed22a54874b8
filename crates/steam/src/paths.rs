use std::path::PathBuf;

/// File name of the per-user non-Steam shortcut list.
pub const SHORTCUTS_FILE: &str = "shortcuts.vdf";

/// File name of the account list kept by the Steam client.
pub const LOGIN_USERS_FILE: &str = "loginusers.vdf";

/// Provides access to the per-user directory layout of a Steam installation.
///
/// Locating the installation itself is left to the caller.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance rooted at a Steam base directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Returns the client-wide config directory.
    pub fn steam_config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    /// Returns the path to loginusers.vdf.
    pub fn login_users_path(&self) -> PathBuf {
        self.steam_config_dir().join(LOGIN_USERS_FILE)
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific user.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.user_data_dir().join(user_id)
    }

    /// Returns the config directory for a user.
    pub fn config_dir(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("config")
    }

    /// Returns the path to shortcuts.vdf for a user.
    pub fn shortcuts_path(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join(SHORTCUTS_FILE)
    }
}
