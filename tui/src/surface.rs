//! [`TargetSurface`] adapter over the host's input pane.
//!
//! The pane stays owned by the host; the engine gets a short-lived borrow per
//! event. `None` models the target being gone from the screen entirely (the
//! user is on the conversation picker, or the chat view was torn down), which
//! the engine treats as an expected condition rather than an error.

use ghosttype_engine::CaretAnchor;
use ghosttype_engine::TargetSurface;

use crate::input_pane::MessageInput;

pub struct InputSurface<'a> {
    input: Option<&'a mut MessageInput>,
    focused: bool,
}

impl<'a> InputSurface<'a> {
    pub fn new(input: Option<&'a mut MessageInput>, focused: bool) -> Self {
        Self { input, focused }
    }
}

impl TargetSurface for InputSurface<'_> {
    fn read_text(&self) -> Option<String> {
        self.input.as_ref().map(|input| input.text().to_string())
    }

    fn append_text(&mut self, text: &str) -> bool {
        match &mut self.input {
            Some(input) => {
                input.append(text);
                true
            }
            None => false,
        }
    }

    fn caret_anchor(&self) -> Option<CaretAnchor> {
        self.input.as_ref()?.caret_anchor()
    }

    fn has_focus(&self) -> bool {
        self.focused && self.input.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn absent_input_reads_as_no_target() {
        let mut surface = InputSurface::new(None, true);
        assert_eq!(surface.read_text(), None);
        assert!(!surface.append_text("x"));
        assert_eq!(surface.caret_anchor(), None);
        assert!(!surface.has_focus());
    }

    #[test]
    fn present_input_is_read_and_appended_through_the_borrow() {
        let mut input = MessageInput::new();
        input.insert_str("Hello");

        let mut surface = InputSurface::new(Some(&mut input), true);
        assert_eq!(surface.read_text().as_deref(), Some("Hello"));
        assert!(surface.has_focus());
        assert!(surface.append_text(" world"));

        assert_eq!(input.text(), "Hello world");
    }

    #[test]
    fn unfocused_host_view_reports_no_focus() {
        let mut input = MessageInput::new();
        let surface = InputSurface::new(Some(&mut input), false);
        assert!(!surface.has_focus());
    }
}
