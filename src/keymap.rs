use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::NavMode;
use crate::menu::Mode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenSettings,
    CloseSettings,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Select,
}

/// Physical keys behind the mode-dependent actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeKeys {
    pub quit: KeyCode,
    pub settings: KeyCode,
}

impl SchemeKeys {
    pub fn for_mode(nav_mode: NavMode) -> Self {
        match nav_mode {
            NavMode::Letters => SchemeKeys {
                quit: KeyCode::Char('q'),
                settings: KeyCode::Char('s'),
            },
            NavMode::FunctionKeys => SchemeKeys {
                quit: KeyCode::F(1),
                settings: KeyCode::F(2),
            },
        }
    }
}

pub fn resolve(nav_mode: NavMode, mode: Mode, key: &KeyEvent) -> Option<Action> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let scheme = SchemeKeys::for_mode(nav_mode);
    let action = match key.code {
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Enter => Action::Select,
        code if code == scheme.quit => match mode {
            Mode::Browsing => Action::Quit,
            Mode::Settings => Action::CloseSettings,
        },
        code if code == scheme.settings => match mode {
            Mode::Browsing => Action::OpenSettings,
            Mode::Settings => Action::CloseSettings,
        },
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_scheme() {
        let nav = NavMode::Letters;
        assert_eq!(
            resolve(nav, Mode::Browsing, &key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
        assert_eq!(
            resolve(nav, Mode::Browsing, &key(KeyCode::Char('s'))),
            Some(Action::OpenSettings)
        );
        assert_eq!(
            resolve(nav, Mode::Settings, &key(KeyCode::Char('s'))),
            Some(Action::CloseSettings)
        );
        assert_eq!(
            resolve(nav, Mode::Settings, &key(KeyCode::Char('q'))),
            Some(Action::CloseSettings)
        );
        assert_eq!(resolve(nav, Mode::Browsing, &key(KeyCode::F(1))), None);
    }

    #[test]
    fn function_key_scheme() {
        let nav = NavMode::FunctionKeys;
        assert_eq!(
            resolve(nav, Mode::Browsing, &key(KeyCode::F(1))),
            Some(Action::Quit)
        );
        assert_eq!(
            resolve(nav, Mode::Browsing, &key(KeyCode::F(2))),
            Some(Action::OpenSettings)
        );
        assert_eq!(
            resolve(nav, Mode::Settings, &key(KeyCode::F(2))),
            Some(Action::CloseSettings)
        );
        assert_eq!(resolve(nav, Mode::Browsing, &key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn shared_keys_in_both_schemes() {
        for nav in [NavMode::Letters, NavMode::FunctionKeys] {
            assert_eq!(
                resolve(nav, Mode::Browsing, &key(KeyCode::Up)),
                Some(Action::MoveUp)
            );
            assert_eq!(
                resolve(nav, Mode::Browsing, &key(KeyCode::Down)),
                Some(Action::MoveDown)
            );
            assert_eq!(
                resolve(nav, Mode::Browsing, &key(KeyCode::PageDown)),
                Some(Action::PageDown)
            );
            assert_eq!(
                resolve(nav, Mode::Browsing, &key(KeyCode::PageUp)),
                Some(Action::PageUp)
            );
            assert_eq!(
                resolve(nav, Mode::Settings, &key(KeyCode::Enter)),
                Some(Action::Select)
            );
        }
    }

    #[test]
    fn modified_letters_are_ignored() {
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(resolve(NavMode::Letters, Mode::Browsing, &ctrl_q), None);
    }
}
