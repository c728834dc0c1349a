use super::*;

use std::{collections::HashMap, io::Write};

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = load_settings_with_env(Some(&dir.path().join("absent.toml")), no_env);
    assert_eq!(settings, Settings::default());
    assert!(settings.show_legend);
    assert!(!settings.cooperative_gestures);
}

#[test]
fn file_values_override_defaults() {
    let file = config_file(
        r#"
map_id = "abc123"
catalog = "layers.json"

[ui_controls]
cooperative_gestures = true
full_screen_button = true
"#,
    );

    let settings = load_settings_with_env(Some(file.path()), no_env);

    assert_eq!(settings.map_id, "abc123");
    assert_eq!(settings.catalog_path, Some(PathBuf::from("layers.json")));
    assert!(settings.cooperative_gestures);
    assert!(settings.full_screen_button);
    assert!(settings.show_legend);
    assert_eq!(settings.mount_element, "map");
}

#[test]
fn env_overrides_file() {
    let file = config_file("map_id = \"from-file\"\n");
    let env = env_from(&[
        ("MAP_ID", "plain"),
        ("APP__MAP_ID", "prefixed"),
        ("APP__SHOW_LEGEND", "off"),
        ("APP__FULL_SCREEN_BUTTON", "maybe"),
    ]);

    let settings = load_settings_with_env(Some(file.path()), env);

    assert_eq!(settings.map_id, "prefixed");
    assert!(!settings.show_legend);
    assert!(!settings.full_screen_button);
}

#[test]
fn malformed_file_is_ignored() {
    let file = config_file("map_id = [not toml");
    let settings = load_settings_with_env(Some(file.path()), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn embed_settings_carry_ui_controls() {
    let settings = Settings {
        show_legend: false,
        ..Settings::default()
    };
    let embed = settings.embed_settings();
    assert_eq!(embed.map_id.as_str(), "nwB1j9CilTkak2n66zCEUfA");
    assert!(!embed.options.ui_controls.show_legend);
}
