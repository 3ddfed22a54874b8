//! Non-Steam game shortcuts stored in a user's `shortcuts.vdf`.
//!
//! Each operation here is a full read-modify-write of the file. There is no
//! cache and no lock; the last writer wins.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SteamError;
use crate::app_id::{allocate_app_id, is_non_steam_app_id};
use crate::users::User;
use crate::vdf::{self, VdfNode, VdfObject};

/// Top-level key holding the shortcut list.
const SHORTCUTS_KEY: &str = "shortcuts";

/// One non-Steam game registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// 0 until assigned; assigned ids lie in the non-Steam range.
    pub app_id: u32,
    pub app_name: String,
    /// Executable path wrapped in double quotes.
    pub exe: String,
    /// Working directory wrapped in double quotes.
    pub start_dir: String,
    pub icon: String,
    pub shortcut_path: String,
    pub launch_options: String,
    pub is_hidden: u32,
    pub allow_desktop_config: u32,
    pub allow_overlay: u32,
    pub open_vr: u32,
    pub devkit: u32,
    pub devkit_game_id: String,
    pub devkit_override_app_id: u32,
    /// Unix timestamp, 0 if never played.
    pub last_play_time: u32,
    pub flatpak_app_id: String,
    /// Slot index ("0", "1", ...) to tag label.
    pub tags: BTreeMap<String, String>,
}

impl Shortcut {
    /// Creates a shortcut for `exe_path` with Steam's defaults.
    ///
    /// The executable and its parent directory are quoted for Steam's argument
    /// parsing. The AppID is left at 0 for [`add_shortcut`] to assign.
    pub fn new(app_name: impl Into<String>, exe_path: &str) -> Self {
        Self {
            app_name: app_name.into(),
            exe: quote(exe_path),
            start_dir: quote(&parent_dir(exe_path)),
            allow_desktop_config: 1,
            allow_overlay: 1,
            ..Self::default()
        }
    }

    /// Maps a shortcut entry object onto the entity.
    ///
    /// Unknown keys are ignored. A known key holding a value of the wrong type
    /// is skipped and the field keeps its zero value.
    fn from_vdf(entry: &VdfObject) -> Self {
        let mut sc = Shortcut::default();

        for (key, value) in entry.iter() {
            let applied = match key {
                "appid" => set_u32(&mut sc.app_id, value),
                "AppName" | "appname" => set_string(&mut sc.app_name, value),
                "Exe" | "exe" => set_string(&mut sc.exe, value),
                "StartDir" | "startdir" => set_string(&mut sc.start_dir, value),
                "icon" => set_string(&mut sc.icon, value),
                "ShortcutPath" => set_string(&mut sc.shortcut_path, value),
                "LaunchOptions" | "launchoptions" => set_string(&mut sc.launch_options, value),
                "IsHidden" => set_u32(&mut sc.is_hidden, value),
                "AllowDesktopConfig" => set_u32(&mut sc.allow_desktop_config, value),
                "AllowOverlay" => set_u32(&mut sc.allow_overlay, value),
                "OpenVR" => set_u32(&mut sc.open_vr, value),
                "Devkit" => set_u32(&mut sc.devkit, value),
                "DevkitGameID" => set_string(&mut sc.devkit_game_id, value),
                "DevkitOverrideAppID" => set_u32(&mut sc.devkit_override_app_id, value),
                "LastPlayTime" | "lastplaytime" => set_u32(&mut sc.last_play_time, value),
                "FlatpakAppID" => set_string(&mut sc.flatpak_app_id, value),
                "tags" => match value.as_object() {
                    Some(tags) => {
                        sc.tags = parse_tags(tags);
                        true
                    }
                    None => false,
                },
                _ => true,
            };

            if !applied {
                tracing::debug!(
                    key,
                    found = value.type_name(),
                    "ignoring shortcut field with unexpected type"
                );
            }
        }

        sc
    }

    /// Builds the entry object, with keys in the order the Steam client writes them.
    fn to_vdf(&self) -> VdfObject {
        let mut m = VdfObject::new();
        m.insert("appid", self.app_id);
        m.insert("AppName", self.app_name.as_str());
        m.insert("Exe", self.exe.as_str());
        m.insert("StartDir", self.start_dir.as_str());
        m.insert("icon", self.icon.as_str());
        m.insert("ShortcutPath", self.shortcut_path.as_str());
        m.insert("LaunchOptions", self.launch_options.as_str());
        m.insert("IsHidden", self.is_hidden);
        m.insert("AllowDesktopConfig", self.allow_desktop_config);
        m.insert("AllowOverlay", self.allow_overlay);
        m.insert("OpenVR", self.open_vr);
        m.insert("Devkit", self.devkit);
        m.insert("DevkitGameID", self.devkit_game_id.as_str());
        m.insert("DevkitOverrideAppID", self.devkit_override_app_id);
        m.insert("LastPlayTime", self.last_play_time);
        m.insert("FlatpakAppID", self.flatpak_app_id.as_str());

        let mut tags: Vec<(&String, &String)> = self.tags.iter().collect();
        tags.sort_by_key(|(slot, _)| slot.parse::<u32>().ok());
        m.insert(
            "tags",
            tags.into_iter()
                .map(|(slot, label)| (slot.as_str(), label.as_str()))
                .collect::<VdfObject>(),
        );

        m
    }
}

fn set_u32(field: &mut u32, value: &VdfNode) -> bool {
    match value {
        VdfNode::UInt32(v) => {
            *field = *v;
            true
        }
        VdfNode::String(_) | VdfNode::Object(_) => false,
    }
}

fn set_string(field: &mut String, value: &VdfNode) -> bool {
    match value {
        VdfNode::String(s) => {
            field.clone_from(s);
            true
        }
        VdfNode::UInt32(_) | VdfNode::Object(_) => false,
    }
}

fn parse_tags(tags: &VdfObject) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|(slot, value)| match value.as_str() {
            Some(label) => Some((slot.to_owned(), label.to_owned())),
            None => {
                tracing::debug!(slot, found = value.type_name(), "ignoring non-string tag");
                None
            }
        })
        .collect()
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

/// Parent directory of `path`; `.` for a bare file name.
fn parent_dir(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        Some(_) => ".".into(),
        None => path.to_owned(),
    }
}

/// Reads all shortcuts from a shortcuts.vdf file, in file order.
///
/// A missing or zero-length file is an empty list. Top-level keys other
/// than `shortcuts` are ignored.
pub fn read_shortcuts(path: &Path) -> Result<Vec<Shortcut>, SteamError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SteamError::Io(format!(
                "failed to read shortcuts file {}: {e}",
                path.display()
            )));
        }
    };

    if data.is_empty() {
        return Ok(Vec::new());
    }

    let root = vdf::decode(&data)?;

    let Some(list) = root.get(SHORTCUTS_KEY) else {
        return Ok(Vec::new());
    };
    let Some(list) = list.as_object() else {
        tracing::debug!(found = list.type_name(), "shortcuts key is not an object");
        return Ok(Vec::new());
    };

    let shortcuts: Vec<Shortcut> = list
        .iter()
        .filter_map(|(index, node)| match node.as_object() {
            Some(entry) => Some(Shortcut::from_vdf(entry)),
            None => {
                tracing::debug!(index, "skipping shortcut entry that is not an object");
                None
            }
        })
        .collect();

    tracing::debug!(path = %path.display(), count = shortcuts.len(), "read shortcuts");
    Ok(shortcuts)
}

/// Writes shortcuts to a shortcuts.vdf file, replacing its contents.
///
/// Parent directories are created as needed. The write is not atomic: a
/// failure part way through can leave a truncated file behind.
pub fn write_shortcuts(path: &Path, shortcuts: &[Shortcut]) -> Result<(), SteamError> {
    let list: VdfObject = shortcuts
        .iter()
        .enumerate()
        .map(|(i, sc)| (i.to_string(), sc.to_vdf()))
        .collect();

    let mut root = VdfObject::new();
    root.insert(SHORTCUTS_KEY, list);
    let data = vdf::encode(&root)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SteamError::Io(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    fs::write(path, &data).map_err(|e| {
        SteamError::Io(format!(
            "failed to write shortcuts file {}: {e}",
            path.display()
        ))
    })?;

    tracing::debug!(
        path = %path.display(),
        count = shortcuts.len(),
        bytes = data.len(),
        "wrote shortcuts"
    );
    Ok(())
}

/// Adds a shortcut to a user's shortcuts.vdf.
///
/// If a shortcut with the same name already exists, nothing is written and
/// its AppID is returned. Otherwise an AppID is allocated when the shortcut
/// has none; an AppID set by the caller must be in the non-Steam range and
/// not used by another shortcut. Returns the AppID and whether the shortcut
/// was newly created.
pub fn add_shortcut(user: &User, mut shortcut: Shortcut) -> Result<(u32, bool), SteamError> {
    let path = user.shortcuts_path();
    let mut shortcuts = read_shortcuts(&path)?;

    if let Some(existing) = shortcuts.iter().find(|s| s.app_name == shortcut.app_name) {
        tracing::debug!(
            name = %shortcut.app_name,
            app_id = existing.app_id,
            "shortcut already exists"
        );
        return Ok((existing.app_id, false));
    }

    let taken: HashSet<u32> = shortcuts.iter().map(|s| s.app_id).collect();
    match shortcut.app_id {
        0 => shortcut.app_id = allocate_app_id(&taken)?,
        app_id if !is_non_steam_app_id(app_id) => return Err(SteamError::InvalidAppId(app_id)),
        app_id if taken.contains(&app_id) => return Err(SteamError::AppIdConflict(app_id)),
        _ => {}
    }

    let app_id = shortcut.app_id;
    tracing::info!(user = %user.id, name = %shortcut.app_name, app_id, "adding shortcut");

    shortcuts.push(shortcut);
    write_shortcuts(&path, &shortcuts)?;

    Ok((app_id, true))
}

/// Replaces the shortcut with the same AppID, keeping its position.
pub fn update_shortcut(user: &User, shortcut: &Shortcut) -> Result<(), SteamError> {
    let path = user.shortcuts_path();
    let mut shortcuts = read_shortcuts(&path)?;

    let slot = shortcuts
        .iter_mut()
        .find(|s| s.app_id == shortcut.app_id)
        .ok_or(SteamError::ShortcutNotFound(shortcut.app_id))?;
    *slot = shortcut.clone();

    tracing::info!(user = %user.id, app_id = shortcut.app_id, "updating shortcut");
    write_shortcuts(&path, &shortcuts)
}

/// Finds the first shortcut with the given name.
pub fn find_shortcut_by_name(user: &User, name: &str) -> Result<Option<Shortcut>, SteamError> {
    let shortcuts = read_shortcuts(&user.shortcuts_path())?;
    Ok(shortcuts.into_iter().find(|s| s.app_name == name))
}

/// Removes every shortcut with the given AppID.
///
/// Removing an AppID that is not present succeeds without touching the file.
pub fn remove_shortcut(user: &User, app_id: u32) -> Result<(), SteamError> {
    let path = user.shortcuts_path();
    let mut shortcuts = read_shortcuts(&path)?;

    let before = shortcuts.len();
    shortcuts.retain(|s| s.app_id != app_id);
    if shortcuts.len() == before {
        tracing::debug!(app_id, "no shortcut to remove");
        return Ok(());
    }

    tracing::info!(user = %user.id, app_id, removed = before - shortcuts.len(), "removing shortcut");
    write_shortcuts(&path, &shortcuts)
}
