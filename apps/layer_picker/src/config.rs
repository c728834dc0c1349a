use std::{
    fs,
    path::{Path, PathBuf},
};

use map_session::EmbedSettings;
use serde::Deserialize;
use shared::{
    domain::MapId,
    protocol::{EmbedOptions, UiControls},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "layer_picker.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub map_id: String,
    pub mount_element: String,
    pub cooperative_gestures: bool,
    pub show_legend: bool,
    pub full_screen_button: bool,
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            map_id: "nwB1j9CilTkak2n66zCEUfA".into(),
            mount_element: "map".into(),
            cooperative_gestures: false,
            show_legend: true,
            full_screen_button: false,
            catalog_path: None,
        }
    }
}

impl Settings {
    pub fn embed_settings(&self) -> EmbedSettings {
        EmbedSettings {
            map_id: MapId::new(self.map_id.clone()),
            options: EmbedOptions {
                ui_controls: UiControls {
                    cooperative_gestures: self.cooperative_gestures,
                    show_legend: self.show_legend,
                    full_screen_button: self.full_screen_button,
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    map_id: Option<String>,
    mount_element: Option<String>,
    catalog: Option<PathBuf>,
    #[serde(default)]
    ui_controls: FileUiControls,
}

#[derive(Debug, Default, Deserialize)]
struct FileUiControls {
    cooperative_gestures: Option<bool>,
    show_legend: Option<bool>,
    full_screen_button: Option<bool>,
}

/// Defaults, then the config file, then environment variables.
///
/// Without an explicit path, `layer_picker.toml` in the working directory is used if it
/// exists.
pub fn load_settings(path: Option<&Path>) -> Settings {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

fn load_settings_with_env(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    let file_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(file_path) {
        Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(
                path = %file_path.display(),
                error = %err,
                "ignoring malformed config file"
            ),
        },
        Err(err) if path.is_some() => warn!(
            path = %file_path.display(),
            error = %err,
            "config file not readable; using defaults"
        ),
        Err(_) => {}
    }

    if let Some(v) = env("MAP_ID") {
        settings.map_id = v;
    }
    if let Some(v) = env("APP__MAP_ID") {
        settings.map_id = v;
    }

    if let Some(v) = env("APP__MOUNT_ELEMENT") {
        settings.mount_element = v;
    }

    if let Some(v) = env("APP__CATALOG") {
        settings.catalog_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__COOPERATIVE_GESTURES").and_then(|v| parse_flag(&v)) {
        settings.cooperative_gestures = v;
    }
    if let Some(v) = env("APP__SHOW_LEGEND").and_then(|v| parse_flag(&v)) {
        settings.show_legend = v;
    }
    if let Some(v) = env("APP__FULL_SCREEN_BUTTON").and_then(|v| parse_flag(&v)) {
        settings.full_screen_button = v;
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.map_id {
        settings.map_id = v;
    }
    if let Some(v) = file_cfg.mount_element {
        settings.mount_element = v;
    }
    if let Some(v) = file_cfg.catalog {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = file_cfg.ui_controls.cooperative_gestures {
        settings.cooperative_gestures = v;
    }
    if let Some(v) = file_cfg.ui_controls.show_legend {
        settings.show_legend = v;
    }
    if let Some(v) = file_cfg.ui_controls.full_screen_button {
        settings.full_screen_button = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
