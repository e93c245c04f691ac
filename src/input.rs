//! Input mapping: keys and mouse swipes to game actions
//!
//! Terminal mice stand in for touch: press, drag and release is a swipe,
//! press and release in place is a tap.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub move_down: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub help: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("Unknown key name {:?} in bindings", s);
                        return None;
                    }
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            move_down: Self::parse_keys(&settings.keys.move_down),
            rotate: Self::parse_keys(&settings.keys.rotate),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            restart: Self::parse_keys(&settings.keys.restart),
            help: Self::parse_keys(&settings.keys.help),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    fn action_for(&self, code: KeyCode) -> Option<Action> {
        let table = [
            (&self.move_left, Action::MoveLeft),
            (&self.move_right, Action::MoveRight),
            (&self.move_down, Action::MoveDown),
            (&self.rotate, Action::Rotate),
            (&self.hard_drop, Action::HardDrop),
            (&self.restart, Action::Restart),
            (&self.help, Action::ToggleHelp),
            (&self.quit, Action::Quit),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, action)| action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Turns terminal events into actions
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
    /// Where the current mouse press started, as (column, row)
    press: Option<(u16, u16)>,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            press: None,
        }
    }

    /// Handle a key press event
    pub fn key_down(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        self.bindings.action_for(normalize_key(key.code))
    }

    /// Handle a mouse event; a completed swipe or tap yields an action
    pub fn mouse(&mut self, event: MouseEvent) -> Option<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.press.take()?;
                let dx = event.column as i32 - x0 as i32;
                let dy = event.row as i32 - y0 as i32;
                Some(swipe_action(dx, dy))
            }
            _ => None,
        }
    }
}

/// Map a swipe vector (terminal cells, y down) to an action.
///
/// Equal components (including a tap) rotate, the dominant axis decides
/// otherwise: sideways moves, down steps, up drops.
pub fn swipe_action(dx: i32, dy: i32) -> Action {
    if dx == dy {
        Action::Rotate
    } else if dx.abs() > dy.abs() {
        if dx >= 0 { Action::MoveRight } else { Action::MoveLeft }
    } else if dy >= 0 {
        Action::MoveDown
    } else {
        Action::HardDrop
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(input.key_down(press(KeyCode::Char('d'))), Some(Action::MoveRight));
        assert_eq!(input.key_down(press(KeyCode::Char('S'))), Some(Action::MoveDown));
        assert_eq!(input.key_down(press(KeyCode::Up)), Some(Action::Rotate));
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), Some(Action::HardDrop));
        assert_eq!(input.key_down(press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(input.key_down(press(KeyCode::Char('i'))), Some(Action::ToggleHelp));
        assert_eq!(input.key_down(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let input = InputHandler::default();
        let mut key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        assert_eq!(input.key_down(key), Some(Action::Quit));
    }

    #[test]
    fn test_custom_bindings_skip_unknown_names() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["x".to_string(), "NotAKey".to_string()];
        let input = InputHandler::from_settings(&settings);
        assert_eq!(input.key_down(press(KeyCode::Char('x'))), Some(Action::Rotate));
        assert_eq!(input.key_down(press(KeyCode::Up)), None);
    }

    #[test]
    fn test_swipes() {
        assert_eq!(swipe_action(0, 0), Action::Rotate);
        assert_eq!(swipe_action(3, 3), Action::Rotate);
        assert_eq!(swipe_action(6, 1), Action::MoveRight);
        assert_eq!(swipe_action(-6, 2), Action::MoveLeft);
        assert_eq!(swipe_action(1, 4), Action::MoveDown);
        assert_eq!(swipe_action(1, -4), Action::HardDrop);
    }

    #[test]
    fn test_mouse_press_and_release() {
        let mut input = InputHandler::default();
        assert_eq!(input.mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)), None);
        assert_eq!(
            input.mouse(mouse(MouseEventKind::Up(MouseButton::Left), 2, 11)),
            Some(Action::MoveLeft)
        );
        // Release without a press is ignored
        assert_eq!(input.mouse(mouse(MouseEventKind::Up(MouseButton::Left), 2, 11)), None);
    }
}
