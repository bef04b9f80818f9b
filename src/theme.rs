use ratatui::style::{Color, Modifier, Style};

use crate::config::Settings;

const BASE_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
];

/// Maps one of the eight base colour names (any case) to a terminal colour.
/// Anything else is white.
pub fn resolve_color(name: &str) -> Color {
    let name = name.trim();
    BASE_COLORS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
        .unwrap_or(Color::White)
}

pub fn is_known_color(name: &str) -> bool {
    let name = name.trim();
    BASE_COLORS
        .iter()
        .any(|(known, _)| known.eq_ignore_ascii_case(name))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub normal: Style,
    pub selected: Style,
    pub settings_highlight: Style,
}

impl Theme {
    pub fn from_settings(settings: &Settings) -> Self {
        let normal = Style::default()
            .fg(resolve_color(&settings.app_fg))
            .bg(resolve_color(&settings.app_bg));
        let selected = Style::default()
            .fg(resolve_color(&settings.sel_fg))
            .bg(resolve_color(&settings.sel_bg));
        Theme {
            normal,
            selected,
            settings_highlight: selected.add_modifier(Modifier::BOLD),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_settings(&Settings::default())
    }
}
