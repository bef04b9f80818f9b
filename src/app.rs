use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::KeyEvent;
use tracing::{info, warn};

use crate::battery;
use crate::config::{self, AppCatalog, ConfigError, Limits, LoadedConfig, Settings};
use crate::keymap;
use crate::launcher::{self, editor_command, PendingCommand, Shell};
use crate::menu::{visible_rows, Effect, MenuModel};
use crate::render::{self, Screen, View};
use crate::terminal::{Input, Surface};
use crate::theme;

pub const DEFAULT_UPDATE_COMMAND: &str =
    "curl -fsSL https://raw.githubusercontent.com/nebuff/aero/refs/heads/main/update.sh | sh";
pub const DEFAULT_EDITOR: &str = "nano";

#[derive(Clone, Debug)]
pub struct Options {
    pub limits: Limits,
    pub update_command: String,
    pub editor: String,
    pub battery: fn() -> Option<u8>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            update_command: DEFAULT_UPDATE_COMMAND.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
            battery: battery::read_percent,
        }
    }
}

pub struct App {
    config_path: PathBuf,
    config_label: String,
    options: Options,
    settings: Settings,
    catalog: AppCatalog,
    model: MenuModel,
    status_message: Option<String>,
    pending_command: Option<PendingCommand>,
    reload_after_command: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config_path: PathBuf, loaded: LoadedConfig, options: Options) -> Self {
        warn_unknown_colors(&loaded.settings);
        App {
            config_label: config_path.display().to_string(),
            config_path,
            options,
            settings: loaded.settings,
            catalog: loaded.catalog,
            model: MenuModel::new(),
            status_message: None,
            pending_command: None,
            reload_after_command: false,
            should_quit: false,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent, visible_rows: usize) {
        let Some(action) = keymap::resolve(self.settings.nav_mode, self.model.mode(), &key) else {
            return;
        };
        self.set_status(None);
        let effect = self
            .model
            .transition(action, self.catalog.len(), visible_rows);
        match effect {
            Effect::None => {}
            Effect::Quit => self.should_quit = true,
            Effect::Launch(index) => {
                if let Some(entry) = self.catalog.get(index) {
                    info!(name = %entry.name, alias = %entry.alias, "launching");
                    self.pending_command = Some(PendingCommand::launch(entry));
                }
            }
            Effect::RunUpdater => {
                info!(command = %self.options.update_command, "running updater");
                self.pending_command =
                    Some(PendingCommand::maintenance(&self.options.update_command));
            }
            Effect::EditConfig => {
                let command = editor_command(&self.options.editor, &self.config_path);
                self.pending_command = Some(PendingCommand::maintenance(command));
                self.reload_after_command = true;
            }
            Effect::ToggleNavMode => self.toggle_nav_mode(),
        }
    }

    /// Keeps the highlight and scroll window valid for the current list and height.
    pub fn reflow(&mut self, visible_rows: usize) {
        self.model.reflow(self.catalog.len(), visible_rows);
    }

    pub fn take_pending_command(&mut self) -> Option<PendingCommand> {
        self.pending_command.take()
    }

    /// Called once the terminal is back after a pending command.
    pub fn command_finished(&mut self) {
        if !std::mem::take(&mut self.reload_after_command) {
            return;
        }
        match self.reload_from_disk() {
            Ok(()) => self.set_status(Some(format!("Reloaded {}", self.config_label))),
            Err(err) => {
                warn!(error = %err, "reload failed, keeping previous list");
                self.set_status(Some(format!(
                    "Reload failed: {:#}",
                    anyhow::Error::new(err)
                )));
            }
        }
    }

    pub fn reload_from_disk(&mut self) -> Result<(), ConfigError> {
        let loaded = config::load_with(&self.config_path, &self.options.limits)?;
        warn_unknown_colors(&loaded.settings);
        self.settings = loaded.settings;
        self.catalog = loaded.catalog;
        Ok(())
    }

    pub fn screen(&self, width: u16, height: u16, battery: Option<u8>) -> Screen {
        render::draw(&View {
            model: &self.model,
            settings: &self.settings,
            catalog: &self.catalog,
            width,
            height,
            battery,
            status: self.status_text(),
            config_name: &self.config_label,
        })
    }

    fn toggle_nav_mode(&mut self) {
        self.settings.nav_mode = self.settings.nav_mode.toggled();
        let label = self.settings.nav_mode.label();
        match config::save(&self.config_path, &self.settings) {
            Ok(()) => self.set_status(Some(format!("Special Key Mode: {label} (saved)"))),
            Err(err) => {
                warn!(error = %err, "settings not saved");
                self.set_status(Some(format!(
                    "Could not save settings: {:#}",
                    anyhow::Error::new(err)
                )));
            }
        }
    }

    fn set_status(&mut self, message: Option<String>) {
        self.status_message = message;
    }
}

fn warn_unknown_colors(settings: &Settings) {
    let colors = [
        ("app_fg", &settings.app_fg),
        ("app_bg", &settings.app_bg),
        ("sel_fg", &settings.sel_fg),
        ("sel_bg", &settings.sel_bg),
    ];
    for (key, name) in colors {
        if !theme::is_known_color(name) {
            warn!(key, color = %name, "unknown color, using white");
        }
    }
}

/// Draw, read a key, act, repeat until quit.
pub fn run<S, H>(app: &mut App, surface: &mut S, shell: &mut H) -> Result<()>
where
    S: Surface + ?Sized,
    H: Shell + ?Sized,
{
    loop {
        let (width, height) = surface.size()?;
        let rows = visible_rows(height);
        app.reflow(rows);
        let battery = (app.options.battery)();
        surface.present(&app.screen(width, height, battery))?;

        match surface.next_input()? {
            Input::Key(key) => app.handle_key(key, rows),
            Input::Resize => {}
        }

        if let Some(pending) = app.take_pending_command() {
            launcher::run_command(surface, shell, &pending)?;
            app.command_finished();
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
