use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{AppCatalog, NavMode, Settings};
use crate::menu::{visible_rows, MenuModel, Mode, SettingsRow, HEADER_ROWS};
use crate::theme::Theme;

const TITLE: &str = "Aero App Center (TUI)";
const SETTINGS_TITLE: &str = "Aero Settings";
const LEFT_MARGIN: u16 = 2;
const ENTRY_COL: u16 = 4;
const STATUS_ROW: u16 = 2;
const MORE_ABOVE: &str = "▲";
const MORE_BELOW: &str = "▼";

/// Styled text at a fixed cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub style: Style,
}

/// One full frame: the surface clears, writes every run, then refreshes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Screen {
    runs: Vec<TextRun>,
}

impl Screen {
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn run_at(&self, row: u16, col: u16) -> Option<&TextRun> {
        self.runs.iter().find(|run| run.row == row && run.col == col)
    }

    /// Plain text of one row, one cell per char, trailing blanks removed.
    pub fn line(&self, row: u16) -> String {
        let mut cells: Vec<char> = Vec::new();
        for run in self.runs.iter().filter(|run| run.row == row) {
            for (offset, ch) in run.text.chars().enumerate() {
                let col = usize::from(run.col) + offset;
                if cells.len() <= col {
                    cells.resize(col + 1, ' ');
                }
                cells[col] = ch;
            }
        }
        cells.into_iter().collect::<String>().trim_end().to_string()
    }

    fn put(&mut self, row: u16, col: u16, text: impl Into<String>, style: Style) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.runs.push(TextRun {
            row,
            col,
            text,
            style,
        });
    }
}

/// Everything a frame depends on.
pub struct View<'a> {
    pub model: &'a MenuModel,
    pub settings: &'a Settings,
    pub catalog: &'a AppCatalog,
    pub width: u16,
    pub height: u16,
    pub battery: Option<u8>,
    pub status: Option<&'a str>,
    pub config_name: &'a str,
}

pub fn draw(view: &View) -> Screen {
    let theme = Theme::from_settings(view.settings);
    let mut screen = Screen::default();
    match view.model.mode() {
        Mode::Browsing => draw_browsing(&mut screen, view, &theme),
        Mode::Settings => draw_settings(&mut screen, view, &theme),
    }
    if let Some(status) = view.status {
        let text = fit(status, view.width.saturating_sub(LEFT_MARGIN));
        screen.put(STATUS_ROW, LEFT_MARGIN, text, theme.normal.add_modifier(Modifier::BOLD));
    }
    screen
}

fn draw_browsing(screen: &mut Screen, view: &View, theme: &Theme) {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    screen.put(0, LEFT_MARGIN, fit(TITLE, view.width.saturating_sub(LEFT_MARGIN)), title_style);
    if let Some(percent) = view.battery {
        let label = format!("Battery: {percent}%");
        let needed = LEFT_MARGIN as usize + TITLE.width() + 2 + label.width() + LEFT_MARGIN as usize;
        if usize::from(view.width) >= needed {
            let col = view.width - LEFT_MARGIN - label.width() as u16;
            screen.put(0, col, label, Style::default());
        }
    }
    let help = match view.settings.nav_mode {
        NavMode::FunctionKeys => "F1: Quit, F2: Settings, arrows to navigate, Enter to select",
        NavMode::Letters => "Use arrow keys, Enter to select, q to quit, s for settings.",
    };
    screen.put(1, LEFT_MARGIN, fit(help, view.width.saturating_sub(LEFT_MARGIN)), Style::default());

    if view.catalog.is_empty() {
        let hint = format!("No apps configured. Edit {} to add some.", view.config_name);
        screen.put(HEADER_ROWS, ENTRY_COL, fit(&hint, view.width.saturating_sub(ENTRY_COL)), theme.normal);
        return;
    }

    let rows = visible_rows(view.height);
    let offset = view.model.scroll_offset();
    let name_width = view.width.saturating_sub(ENTRY_COL + 1);
    let mut drawn = 0u16;
    for (index, entry) in view.catalog.iter().enumerate().skip(offset).take(rows) {
        let style = if index == view.model.selected() {
            theme.selected
        } else {
            theme.normal
        };
        screen.put(HEADER_ROWS + drawn, ENTRY_COL, fit(&entry.name, name_width), style);
        drawn += 1;
    }
    if offset > 0 {
        screen.put(HEADER_ROWS, LEFT_MARGIN, MORE_ABOVE, theme.normal);
    }
    if offset + rows < view.catalog.len() && drawn > 0 {
        screen.put(HEADER_ROWS + drawn - 1, LEFT_MARGIN, MORE_BELOW, theme.normal);
    }
}

fn draw_settings(screen: &mut Screen, view: &View, theme: &Theme) {
    let settings = view.settings;
    let width = view.width;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    screen.put(0, LEFT_MARGIN, fit(SETTINGS_TITLE, width.saturating_sub(LEFT_MARGIN)), bold);
    let help = match settings.nav_mode {
        NavMode::FunctionKeys => "Use arrow keys, Enter to select, F1 to return.",
        NavMode::Letters => "Use arrow keys, Enter to select, q to return.",
    };
    screen.put(1, LEFT_MARGIN, fit(help, width.saturating_sub(LEFT_MARGIN)), Style::default());

    let current = view.model.settings_row();
    for row in SettingsRow::ALL {
        let (line, text) = match row {
            SettingsRow::UpdateAero => (3, "Update Aero".to_string()),
            SettingsRow::EditAppList => (4, "Edit App List".to_string()),
            SettingsRow::Back => (5, "Back".to_string()),
            SettingsRow::ToggleNavMode => (
                7,
                format!("Special Key Mode: {}", settings.nav_mode.label()),
            ),
        };
        let style = if row == current {
            theme.settings_highlight
        } else {
            theme.normal
        };
        screen.put(line, ENTRY_COL, fit(&text, width.saturating_sub(ENTRY_COL)), style);
    }

    let notes = [
        (8, ENTRY_COL, format!("(Toggle and save to {})", view.config_name)),
        (
            10,
            LEFT_MARGIN,
            format!("App Color: fg={} bg={}", settings.app_fg, settings.app_bg),
        ),
        (
            11,
            LEFT_MARGIN,
            format!("Selected Color: fg={} bg={}", settings.sel_fg, settings.sel_bg),
        ),
        (
            12,
            LEFT_MARGIN,
            format!("Edit {} to change colors.", view.config_name),
        ),
    ];
    for (line, col, text) in notes {
        screen.put(line, col, fit(&text, width.saturating_sub(col)), Style::default());
    }
}

/// Longest prefix of `text` that fits in `width` columns.
fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

/// Writes a prepared screen into a ratatui frame.
pub fn paint(frame: &mut Frame, screen: &Screen) {
    let area = frame.size();
    for run in screen.runs() {
        if run.row >= area.height || run.col >= area.width {
            continue;
        }
        let text_width = u16::try_from(run.text.width()).unwrap_or(u16::MAX);
        let width = (area.width - run.col).min(text_width);
        let rect = Rect::new(area.x + run.col, area.y + run.row, width, 1);
        let line = Line::from(Span::styled(run.text.as_str(), run.style));
        frame.render_widget(Paragraph::new(line), rect);
    }
}
