fn main() {
    println!("Run `cargo test -p vdf-compat` to execute shortcuts.vdf compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use zladxhd_steam::vdf::{decode, encode};
    use zladxhd_steam::{Shortcut, User, add_shortcut, read_shortcuts, write_shortcuts};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a binary fixture as laid out by the Steam client.
    fn load_vdf(name: &str) -> Vec<u8> {
        let path = fixtures_dir().join(name);
        fs::read(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Loads the expected shortcut list for a fixture.
    fn load_expected(name: &str) -> Vec<Shortcut> {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    #[test]
    fn steam_layout_reads_expected_shortcuts() {
        let shortcuts = read_shortcuts(&fixtures_dir().join("shortcuts_steam.vdf")).unwrap();
        assert_eq!(shortcuts, load_expected("shortcuts_steam.json"));
    }

    #[test]
    fn steam_layout_decode_encode_is_byte_identical() {
        let data = load_vdf("shortcuts_steam.vdf");
        let root = decode(&data).unwrap();
        assert_eq!(encode(&root).unwrap(), data);
    }

    #[test]
    fn steam_layout_rewrite_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shortcuts.vdf");

        write_shortcuts(&path, &load_expected("shortcuts_steam.json")).unwrap();
        assert_eq!(fs::read(&path).unwrap(), load_vdf("shortcuts_steam.vdf"));
    }

    #[test]
    fn add_to_steam_file_appends_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let user = User::new("12345", tmp.path());
        fs::write(user.shortcuts_path(), load_vdf("shortcuts_steam.vdf")).unwrap();

        let existing = load_expected("shortcuts_steam.json");
        let (app_id, is_new) =
            add_shortcut(&user, Shortcut::new("New Game", "/games/new/new.exe")).unwrap();
        assert!(is_new);
        assert!(existing.iter().all(|s| s.app_id != app_id));

        let shortcuts = read_shortcuts(&user.shortcuts_path()).unwrap();
        assert_eq!(shortcuts.len(), existing.len() + 1);
        assert_eq!(&shortcuts[..existing.len()], existing.as_slice());
        assert_eq!(shortcuts.last().unwrap().app_id, app_id);
    }

    #[test]
    fn legacy_layout_reads_lowercase_keys() {
        let shortcuts = read_shortcuts(&fixtures_dir().join("shortcuts_legacy.vdf")).unwrap();
        assert_eq!(shortcuts.len(), 1);

        let sc = &shortcuts[0];
        assert_eq!(sc.app_id, 0xFF00_00AA);
        assert_eq!(sc.app_name, "Legacy Game");
        assert_eq!(sc.exe, "\"/opt/legacy/game\"");
        assert_eq!(sc.start_dir, "\"/opt/legacy\"");
        assert_eq!(sc.last_play_time, 1_600_000_000);
        assert_eq!(sc.tags.get("0").map(String::as_str), Some("Old"));
        assert_eq!(sc.allow_overlay, 0);
    }

    #[test]
    fn legacy_layout_keeps_unknown_keys_in_tree() {
        let root = decode(&load_vdf("shortcuts_legacy.vdf")).unwrap();
        let entry = root
            .get_object("shortcuts")
            .and_then(|list| list.get_object("0"))
            .unwrap();
        assert_eq!(entry.get_str("sortas"), Some("legacy"));
    }

    #[test]
    fn truncated_fixture_fails_to_parse() {
        let data = load_vdf("shortcuts_steam.vdf");
        for len in [12, data.len() / 2, data.len() - 3] {
            assert!(
                decode(&data[..len]).is_err(),
                "prefix of {len} bytes should not parse"
            );
        }
    }
}
