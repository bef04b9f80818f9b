use tracing::debug;

use crate::keymap::Action;

/// Rows above the app list: title, help line and the status line.
pub const HEADER_ROWS: u16 = 3;

pub fn visible_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(HEADER_ROWS)).max(1)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browsing,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    UpdateAero,
    EditAppList,
    Back,
    ToggleNavMode,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 4] = [
        SettingsRow::UpdateAero,
        SettingsRow::EditAppList,
        SettingsRow::Back,
        SettingsRow::ToggleNavMode,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// What the caller has to do after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Launch(usize),
    RunUpdater,
    EditConfig,
    ToggleNavMode,
}

/// Which list is active, where its highlight sits and the first visible app.
///
/// The browsing highlight survives a visit to the settings panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuModel {
    mode: Mode,
    selected: usize,
    settings_row: usize,
    scroll_offset: usize,
}

impl MenuModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn highlight(&self) -> usize {
        match self.mode {
            Mode::Browsing => self.selected,
            Mode::Settings => self.settings_row,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn settings_row(&self) -> SettingsRow {
        SettingsRow::from_index(self.settings_row).unwrap_or(SettingsRow::UpdateAero)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn transition(&mut self, action: Action, app_count: usize, visible_rows: usize) -> Effect {
        let effect = match self.mode {
            Mode::Browsing => self.browse(action, app_count, visible_rows),
            Mode::Settings => self.configure(action),
        };
        debug!(
            ?action,
            ?effect,
            mode = ?self.mode,
            highlight = self.highlight(),
            scroll = self.scroll_offset,
            "menu transition"
        );
        effect
    }

    /// Re-establishes the scroll invariant after the list or the window changed size.
    pub fn reflow(&mut self, app_count: usize, visible_rows: usize) {
        self.selected = self.selected.min(app_count.saturating_sub(1));
        self.keep_visible(app_count, visible_rows);
    }

    fn browse(&mut self, action: Action, app_count: usize, visible_rows: usize) -> Effect {
        let last = app_count.saturating_sub(1);
        let rows = visible_rows.max(1);
        match action {
            Action::Quit => return Effect::Quit,
            Action::OpenSettings => {
                self.mode = Mode::Settings;
                self.settings_row = 0;
                return Effect::None;
            }
            Action::Select => {
                return if app_count == 0 {
                    Effect::None
                } else {
                    Effect::Launch(self.selected.min(last))
                };
            }
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveDown => self.selected = (self.selected + 1).min(last),
            Action::PageUp => self.selected = self.selected.saturating_sub(rows),
            Action::PageDown => self.selected = (self.selected + rows).min(last),
            Action::CloseSettings => {}
        }
        self.keep_visible(app_count, rows);
        Effect::None
    }

    fn configure(&mut self, action: Action) -> Effect {
        let last = SettingsRow::ALL.len() - 1;
        match action {
            Action::CloseSettings => self.mode = Mode::Browsing,
            Action::MoveUp => self.settings_row = self.settings_row.saturating_sub(1),
            Action::MoveDown => self.settings_row = (self.settings_row + 1).min(last),
            Action::Select => {
                self.mode = Mode::Browsing;
                return match self.settings_row() {
                    SettingsRow::UpdateAero => Effect::RunUpdater,
                    SettingsRow::EditAppList => Effect::EditConfig,
                    SettingsRow::Back => Effect::None,
                    SettingsRow::ToggleNavMode => Effect::ToggleNavMode,
                };
            }
            Action::Quit | Action::OpenSettings | Action::PageUp | Action::PageDown => {}
        }
        Effect::None
    }

    fn keep_visible(&mut self, app_count: usize, visible_rows: usize) {
        let rows = visible_rows.max(1);
        let max_offset = app_count.saturating_sub(rows);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.selected >= self.scroll_offset + rows {
            self.scroll_offset = self.selected + 1 - rows;
        }
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}
