//! Main front-end window
//!
//! Two lists side by side: configured systems on the left, the games found
//! for the selected system on the right. Everything runs on the UI thread;
//! scanning and launching block the window while they work.

use super::settings::{Settings, Theme};
use crate::error::{Error, ErrorKind};
use crate::launcher::{default_launcher, ProcessLauncher};
use crate::session::{Selection, Session};
use std::path::PathBuf;

const WINDOW_TITLE: &str = "Jolly Good Emulation";

/// A message waiting for the user to acknowledge it
struct ErrorDialog {
    heading: &'static str,
    message: String,
}

/// UI dialog state
#[derive(Default)]
struct DialogState {
    show_about: bool,
    error: Option<ErrorDialog>,
}

impl DialogState {
    fn any_open(&self) -> bool {
        self.show_about || self.error.is_some()
    }

    fn close_all(&mut self) {
        self.show_about = false;
        self.error = None;
    }
}

/// Keyboard input collected for one frame
struct Shortcuts {
    reload: bool,
    about: bool,
    escape: bool,
    enter: bool,
    up: bool,
    down: bool,
}

/// Main application state
pub struct JgemuApp {
    settings: Settings,
    config_path: PathBuf,
    launcher: Box<dyn ProcessLauncher>,

    // Replaced wholesale on reload / platform selection
    session: Option<Session>,
    selection: Option<Selection>,

    selected_platform: Option<usize>,
    selected_game: Option<usize>,
    scroll_to_game: bool,

    dialogs: DialogState,
    theme_applied: bool,
}

impl JgemuApp {
    pub fn new(config_path: PathBuf) -> Self {
        let mut app = Self {
            settings: Settings::load(),
            config_path,
            launcher: default_launcher(),
            session: None,
            selection: None,
            selected_platform: None,
            selected_game: None,
            scroll_to_game: false,
            dialogs: DialogState::default(),
            theme_applied: false,
        };
        let loaded = Session::load(app.config_path.clone());
        app.install_session(loaded);
        app
    }

    /// Drop everything derived from the previous config and show the new one
    fn install_session(&mut self, loaded: Result<Session, Error>) {
        self.session = None;
        self.selection = None;
        self.selected_platform = None;
        self.selected_game = None;

        match loaded {
            Ok(session) => {
                self.config_path = session.config_path().to_path_buf();
                self.session = Some(session);
                self.select_platform(0);
            }
            Err(e) => self.show_error(e),
        }
    }

    fn reload(&mut self) {
        let reloaded = match self.session.take() {
            Some(session) => session.reload(),
            None => Session::load(self.config_path.clone()),
        };
        self.install_session(reloaded);
    }

    fn open_config(&mut self, path: PathBuf) {
        log::info!("Opening config file: {}", path.display());
        self.install_session(Session::load(path));
    }

    fn open_config_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("Config files", &["ini"])
            .set_title("Open config file");

        if let Some(dir) = self.config_path.parent().filter(|d| d.is_dir()) {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.open_config(path);
        }
    }

    fn select_platform(&mut self, index: usize) {
        self.selection = None;
        self.selected_game = None;

        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(name) = session.platforms().get(index) else {
            return;
        };
        let selected = session.select(name);

        self.selected_platform = Some(index);
        match selected {
            Ok(selection) => {
                self.selected_game = (selection.game_count() > 0).then_some(0);
                self.scroll_to_game = true;
                self.selection = Some(selection);
            }
            Err(e) => self.show_error(e),
        }
    }

    fn move_game_selection(&mut self, up: bool) {
        let count = self.selection.as_ref().map_or(0, Selection::game_count);
        if count == 0 {
            return;
        }
        let next = match (self.selected_game, up) {
            (None, _) => 0,
            (Some(i), true) => i.saturating_sub(1),
            (Some(i), false) => (i + 1).min(count - 1),
        };
        self.selected_game = Some(next);
        self.scroll_to_game = true;
    }

    fn launch_selected(&mut self) {
        let (Some(selection), Some(index)) = (self.selection.as_ref(), self.selected_game) else {
            return;
        };

        if let Err(e) = selection.launch(index, self.launcher.as_ref()) {
            self.show_error(e.into());
        }
    }

    fn show_error(&mut self, error: Error) {
        let heading = match error.kind() {
            ErrorKind::ConfigMissing | ErrorKind::ConfigEmpty | ErrorKind::ConfigInvalid => {
                "Configuration problem"
            }
            ErrorKind::UnknownPlatform | ErrorKind::MissingOption(_) => "Platform problem",
            ErrorKind::GamesFolderUnreadable => "Games folder problem",
            ErrorKind::LaunchFailure | ErrorKind::UnexpectedFailure => "Launch problem",
        };
        log::error!("{}: {}", heading, error);
        self.dialogs.error = Some(ErrorDialog {
            heading,
            message: error.to_string(),
        });
    }

    fn set_theme(&mut self, ctx: &egui::Context, theme: Theme) {
        self.settings.theme = theme;
        self.settings.apply_theme(ctx);
        if let Err(e) = self.settings.save() {
            log::error!("Failed to save settings: {}", e);
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let keys = ctx.input(|i| Shortcuts {
            reload: i.modifiers.ctrl && i.key_pressed(egui::Key::R),
            about: i.modifiers.ctrl && i.key_pressed(egui::Key::A),
            escape: i.key_pressed(egui::Key::Escape),
            enter: i.key_pressed(egui::Key::Enter),
            up: i.key_pressed(egui::Key::ArrowUp),
            down: i.key_pressed(egui::Key::ArrowDown),
        });

        // Open dialogs take Enter/Escape for themselves
        if self.dialogs.any_open() {
            if keys.escape || keys.enter {
                self.dialogs.close_all();
            }
            return;
        }

        if keys.escape {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        if keys.reload {
            self.reload();
        }
        if keys.about {
            self.dialogs.show_about = true;
        }
        if keys.up {
            self.move_game_selection(true);
        }
        if keys.down {
            self.move_game_selection(false);
        }
        if keys.enter {
            self.launch_selected();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });

        for path in dropped {
            if path.extension().and_then(|e| e.to_str()) == Some("ini") {
                self.open_config(path);
                break;
            }
            log::warn!("Dropped file is not an .ini file: {}", path.display());
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open config…").clicked() {
                        ui.close_menu();
                        self.open_config_dialog();
                    }
                    if ui
                        .add(egui::Button::new("Reload").shortcut_text("Ctrl+R"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.reload();
                    }
                    ui.separator();
                    if ui.add(egui::Button::new("Quit").shortcut_text("Esc")).clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    for theme in Theme::ALL {
                        if ui.radio(self.settings.theme == theme, theme.label()).clicked() {
                            self.set_theme(ctx, theme);
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui
                        .add(egui::Button::new("About").shortcut_text("Ctrl+A"))
                        .clicked()
                    {
                        self.dialogs.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        let count = self.selection.as_ref().map_or(0, Selection::game_count);
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(format!("Games: {}", count));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(self.config_path.display().to_string());
                    });
                });
            });
    }

    fn render_platforms(&mut self, ctx: &egui::Context) {
        let mut clicked = None;

        egui::SidePanel::left("systems")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Systems");
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("systems_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let Some(session) = self.session.as_ref() else {
                            return;
                        };
                        for (index, name) in session.platforms().iter().enumerate() {
                            let selected = self.selected_platform == Some(index);
                            if ui.selectable_label(selected, name.as_str()).clicked() && !selected {
                                clicked = Some(index);
                            }
                        }
                    });
            });

        if let Some(index) = clicked {
            self.select_platform(index);
        }
    }

    fn render_games(&mut self, ctx: &egui::Context) {
        let scroll = std::mem::take(&mut self.scroll_to_game);
        let selected_game = self.selected_game;
        let mut clicked = None;
        let mut launch = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Games");
            });
            ui.separator();

            let Some(selection) = self.selection.as_ref() else {
                return;
            };
            if selection.game_count() == 0 {
                ui.weak("No games found for this system.");
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("games_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (index, game) in selection.games().iter().enumerate() {
                        let selected = selected_game == Some(index);
                        let response = ui.selectable_label(selected, game.to_string());
                        if selected && scroll {
                            response.scroll_to_me(Some(egui::Align::Center));
                        }
                        if response.double_clicked() {
                            clicked = Some(index);
                            launch = true;
                        } else if response.clicked() {
                            clicked = Some(index);
                        }
                    }
                });
        });

        if let Some(index) = clicked {
            self.selected_game = Some(index);
        }
        if launch {
            self.launch_selected();
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if self.dialogs.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(WINDOW_TITLE);
                        ui.add_space(8.0);
                        ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                        ui.label(env!("CARGO_PKG_DESCRIPTION"));
                        ui.add_space(16.0);
                        if ui.button("Close").clicked() {
                            self.dialogs.show_about = false;
                        }
                    });
                });
        }

        let mut dismissed = false;
        if let Some(ref dialog) = self.dialogs.error {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.strong(dialog.heading);
                    ui.add_space(8.0);
                    ui.label(dialog.message.as_str());
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        if ui.button("OK").clicked() {
                            dismissed = true;
                        }
                    });
                });
        }
        if dismissed {
            self.dialogs.error = None;
        }
    }
}

impl eframe::App for JgemuApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme on first run
        if !self.theme_applied {
            self.settings.apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_dropped_files(ctx);
        self.handle_input(ctx);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_platforms(ctx);
        self.render_games(ctx);
        self.render_dialogs(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.settings.save() {
            log::error!("Failed to save settings: {}", e);
        }
    }
}
