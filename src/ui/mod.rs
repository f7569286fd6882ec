//! Jolly Good Emulation UI - egui/eframe desktop window
//!
//! Lists the configured systems and their games, launches the selected game
//! and reports problems in modal dialogs.

mod app;
mod settings;

pub use app::JgemuApp;
pub use settings::{Settings, Theme};
