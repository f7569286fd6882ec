//! UI preferences, persisted between runs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// UI Theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jgemu").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from: {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::settings_path().ok_or("no configuration directory on this system")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        log::info!("Saved settings to: {}", path.display());
        Ok(())
    }

    /// Apply the current theme to egui
    pub fn apply_theme(&self, ctx: &egui::Context) {
        match self.theme {
            Theme::Dark => ctx.set_visuals(Self::dark_theme()),
            Theme::Light => ctx.set_visuals(Self::light_theme()),
        }
    }

    fn dark_theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.panel_fill = egui::Color32::from_rgb(18, 18, 24);
        visuals.window_fill = egui::Color32::from_rgb(24, 24, 32);
        visuals.extreme_bg_color = egui::Color32::from_rgb(12, 12, 16);
        visuals.selection.bg_fill = egui::Color32::from_rgb(66, 135, 245);

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);

        visuals
    }

    fn light_theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::light();

        visuals.panel_fill = egui::Color32::from_rgb(252, 250, 248);
        visuals.window_fill = egui::Color32::from_rgb(255, 255, 255);
        visuals.selection.bg_fill = egui::Color32::from_rgb(120, 170, 240);

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);

        visuals
    }
}
