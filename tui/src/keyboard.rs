//! Maps raw key events to suggestion intents.
//!
//! The interceptor recognizes exactly two keys, accept (Tab) and dismiss
//! (Esc), and only as plain presses. Everything else maps to nothing and
//! propagates to the host untouched, so ordinary typing is never intercepted.
//! Whether an intent actually takes effect (and therefore whether the host
//! must swallow the key) is decided by the engine, which knows if a suggestion
//! is showing and whether focus is inside the target.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ghosttype_engine::KeyIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInterceptor {
    accept: KeyCode,
    dismiss: KeyCode,
}

impl Default for KeyInterceptor {
    fn default() -> Self {
        Self {
            accept: KeyCode::Tab,
            dismiss: KeyCode::Esc,
        }
    }
}

impl KeyInterceptor {
    pub fn new(accept: KeyCode, dismiss: KeyCode) -> Self {
        Self { accept, dismiss }
    }

    pub fn intent_for(&self, key: KeyEvent) -> Option<KeyIntent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers != KeyModifiers::NONE {
            return None;
        }
        if key.code == self.accept {
            Some(KeyIntent::Accept)
        } else if key.code == self.dismiss {
            Some(KeyIntent::Dismiss)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_map_tab_and_esc() {
        let interceptor = KeyInterceptor::default();
        assert_eq!(interceptor.intent_for(press(KeyCode::Tab)), Some(KeyIntent::Accept));
        assert_eq!(interceptor.intent_for(press(KeyCode::Esc)), Some(KeyIntent::Dismiss));
    }

    #[test]
    fn ordinary_typing_is_not_intercepted() {
        let interceptor = KeyInterceptor::default();
        assert_eq!(interceptor.intent_for(press(KeyCode::Char('a'))), None);
        assert_eq!(interceptor.intent_for(press(KeyCode::Enter)), None);
        assert_eq!(interceptor.intent_for(press(KeyCode::Backspace)), None);
    }

    #[test]
    fn modified_or_released_keys_are_ignored() {
        let interceptor = KeyInterceptor::default();

        let shift_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(interceptor.intent_for(shift_tab), None);

        let mut release = press(KeyCode::Tab);
        release.kind = KeyEventKind::Release;
        assert_eq!(interceptor.intent_for(release), None);
    }

    #[test]
    fn bindings_are_configurable() {
        let interceptor = KeyInterceptor::new(KeyCode::Right, KeyCode::Char('q'));
        assert_eq!(interceptor.intent_for(press(KeyCode::Right)), Some(KeyIntent::Accept));
        assert_eq!(interceptor.intent_for(press(KeyCode::Tab)), None);
    }
}
