use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::session::Direction;
use crate::switcher::Signal;

/// Turns raw terminal key events into gesture signals
///
/// Alt+Tab cycles forward and Alt+Shift+Tab backward. The first press both opens
/// the gesture and advances it, so a quick tap lands on the previous conversation.
/// With release reporting the gesture ends when Alt goes up; otherwise it ends on
/// the first key pressed without Alt.
#[derive(Debug, Default)]
pub struct KeyTranslator {
    reports_release: bool,
    holding: bool,
}

impl KeyTranslator {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            holding: false,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn translate(&mut self, key: &KeyEvent) -> Vec<Signal> {
        if let Some(direction) = trigger_direction(key) {
            if key.kind == KeyEventKind::Release {
                return Vec::new();
            }
            let step = Signal::GestureStep {
                direction,
                modifier_held: true,
            };
            if self.holding {
                return vec![step];
            }
            self.holding = true;
            return vec![
                Signal::GestureBegin {
                    modifier_held: true,
                },
                step,
            ];
        }

        if !self.holding {
            return Vec::new();
        }

        let released = if self.reports_release {
            key.kind == KeyEventKind::Release && is_alt_key(key.code)
        } else {
            key.kind == KeyEventKind::Press && !key.modifiers.contains(KeyModifiers::ALT)
        };

        if released {
            self.holding = false;
            vec![Signal::GestureEnd]
        } else {
            Vec::new()
        }
    }

    /// Forget a gesture the switcher ended on its own
    pub fn reset(&mut self) {
        self.holding = false;
    }
}

fn trigger_direction(key: &KeyEvent) -> Option<Direction> {
    if !key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::BackTab => Some(Direction::Backward),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Direction::Backward),
        KeyCode::Tab => Some(Direction::Forward),
        _ => None,
    }
}

fn is_alt_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Modifier(ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind_and_state(code, modifiers, kind, KeyEventState::NONE)
    }

    fn alt_tab() -> KeyEvent {
        key(KeyCode::Tab, KeyModifiers::ALT, KeyEventKind::Press)
    }

    #[test]
    fn test_first_press_begins_and_steps() {
        let mut translator = KeyTranslator::new(true);
        assert_eq!(
            translator.translate(&alt_tab()),
            vec![
                Signal::GestureBegin {
                    modifier_held: true
                },
                Signal::GestureStep {
                    direction: Direction::Forward,
                    modifier_held: true
                },
            ]
        );
        assert!(translator.is_holding());

        assert_eq!(translator.translate(&alt_tab()).len(), 1);
    }

    #[test]
    fn test_shift_reverses_direction() {
        let mut translator = KeyTranslator::new(true);
        translator.translate(&alt_tab());

        for event in [
            key(KeyCode::BackTab, KeyModifiers::ALT | KeyModifiers::SHIFT, KeyEventKind::Press),
            key(KeyCode::Tab, KeyModifiers::ALT | KeyModifiers::SHIFT, KeyEventKind::Repeat),
        ] {
            assert_eq!(
                translator.translate(&event),
                vec![Signal::GestureStep {
                    direction: Direction::Backward,
                    modifier_held: true
                }]
            );
        }
    }

    #[test]
    fn test_alt_release_ends_gesture() {
        let mut translator = KeyTranslator::new(true);
        translator.translate(&alt_tab());

        // Releasing Tab alone is not the end
        let tab_up = key(KeyCode::Tab, KeyModifiers::ALT, KeyEventKind::Release);
        assert!(translator.translate(&tab_up).is_empty());

        let alt_up = key(
            KeyCode::Modifier(ModifierKeyCode::LeftAlt),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(translator.translate(&alt_up), vec![Signal::GestureEnd]);
        assert!(!translator.is_holding());
        assert!(translator.translate(&alt_up).is_empty());
    }

    #[test]
    fn test_fallback_ends_on_key_without_alt() {
        let mut translator = KeyTranslator::new(false);
        translator.translate(&alt_tab());

        let alt_x = key(KeyCode::Char('x'), KeyModifiers::ALT, KeyEventKind::Press);
        assert!(translator.translate(&alt_x).is_empty());

        let plain = key(KeyCode::Char('j'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translator.translate(&plain), vec![Signal::GestureEnd]);
    }

    #[test]
    fn test_plain_tab_is_not_a_trigger() {
        let mut translator = KeyTranslator::new(true);
        let tab = key(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Press);
        assert!(translator.translate(&tab).is_empty());
        assert!(!translator.is_holding());
    }
}
