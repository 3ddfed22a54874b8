use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SteamError;
use crate::paths::{Paths, SHORTCUTS_FILE};
use crate::text_vdf;
use crate::vdf::VdfObject;

/// Offset between a SteamID64 and the account id used for userdata directories.
const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// A Steam user profile: the account id and its config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub config_path: PathBuf,
    /// Login name from loginusers.vdf, empty if unknown.
    #[serde(default)]
    pub account_name: String,
    /// Profile name from loginusers.vdf, empty if unknown.
    #[serde(default)]
    pub persona_name: String,
}

impl User {
    pub fn new(id: impl Into<String>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            config_path: config_path.into(),
            account_name: String::new(),
            persona_name: String::new(),
        }
    }

    /// Returns the path to the user's shortcuts.vdf file.
    pub fn shortcuts_path(&self) -> PathBuf {
        self.config_path.join(SHORTCUTS_FILE)
    }

    /// Returns true if the user has a shortcuts.vdf file.
    pub fn has_shortcuts(&self) -> bool {
        self.shortcuts_path().exists()
    }

    /// Human-readable label: `Persona (Account)`, the account name, or the id.
    pub fn display_name(&self) -> String {
        if !self.persona_name.is_empty() {
            format!("{} ({})", self.persona_name, self.account_name)
        } else if !self.account_name.is_empty() {
            self.account_name.clone()
        } else {
            format!("User {}", self.id)
        }
    }
}

/// Names recorded for one account in loginusers.vdf.
#[derive(Debug, Clone, Default, PartialEq)]
struct LoginNames {
    account_name: String,
    persona_name: String,
}

/// Returns the users found under the userdata directory, sorted by id.
///
/// Only numeric directory names with a `config` sub-directory count; `0`
/// is Steam's placeholder for a signed-out session and is skipped. Account
/// and persona names come from loginusers.vdf when it can be read.
pub fn get_users_with_paths(paths: &Paths) -> Result<Vec<User>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(format!("failed to read {}: {e}", user_data_dir.display()))
        }
    })?;

    let mut users = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        if name.parse::<u64>().is_err() || name == "0" {
            continue;
        }

        let config_path = paths.config_dir(&name);
        if !is_dir(&config_path) {
            continue;
        }

        users.push(User::new(name.into_owned(), config_path));
    }

    let mut names = load_login_names(paths);
    for user in &mut users {
        if let Some(login) = names.remove(&user.id) {
            user.account_name = login.account_name;
            user.persona_name = login.persona_name;
        }
    }

    users.sort_by_key(|u| u.id.parse::<u64>().unwrap_or(u64::MAX));
    Ok(users)
}

/// Looks up a single user by id.
pub fn find_user(paths: &Paths, user_id: &str) -> Result<User, SteamError> {
    get_users_with_paths(paths)?
        .into_iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| SteamError::UserNotFound(user_id.to_owned()))
}

/// Reads loginusers.vdf, keyed by account id. A missing or unreadable file
/// yields no names.
fn load_login_names(paths: &Paths) -> HashMap<String, LoginNames> {
    let path = paths.login_users_path();
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no login users file");
            return HashMap::new();
        }
    };

    match text_vdf::parse(&content) {
        Ok(root) => login_names_from(&root),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable login users file");
            HashMap::new()
        }
    }
}

fn login_names_from(root: &VdfObject) -> HashMap<String, LoginNames> {
    let Some(users) = root.get_object("users") else {
        return HashMap::new();
    };

    users
        .iter()
        .filter_map(|(steam_id64, node)| {
            let info = node.as_object()?;
            let account_id = steam_id64.parse::<u64>().ok()?.checked_sub(STEAM_ID64_BASE)?;
            let names = LoginNames {
                account_name: info.get_str("AccountName").unwrap_or_default().to_owned(),
                persona_name: info.get_str("PersonaName").unwrap_or_default().to_owned(),
            };
            Some((account_id.to_string(), names))
        })
        .collect()
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
