//! Floating ghost-text element.
//!
//! A single non-interactive decoration rendered after every host widget, so it
//! paints over the frame without ever receiving input or participating in
//! focus. Styling is deliberately subdued (dark gray, italic) so the ghost
//! text visually continues the user's real text without being mistaken for it.

use ghosttype_engine::CaretAnchor;
use ghosttype_engine::SuggestionOverlay;
use ratatui::buffer::Buffer;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Derived, never authoritative: recomputed from the engine's suggestion and
/// the caret geometry on every transition and position tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub text: String,
    pub anchor: Option<CaretAnchor>,
}

#[derive(Debug, Default)]
pub struct GhostTextOverlay {
    state: OverlayState,
}

impl GhostTextOverlay {
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    fn style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    /// Paint the ghost text into the frame buffer. Call after all host
    /// widgets so the decoration lands on top; clipped at the right edge.
    pub fn render(&self, buf: &mut Buffer) {
        if !self.state.visible {
            return;
        }
        let Some(anchor) = self.state.anchor else {
            return;
        };
        let area = buf.area;
        if anchor.y < area.top()
            || anchor.y >= area.bottom()
            || anchor.x < area.left()
            || anchor.x >= area.right()
        {
            return;
        }
        let max_width = (area.right() - anchor.x) as usize;
        buf.set_stringn(anchor.x, anchor.y, &self.state.text, max_width, Self::style());
    }
}

impl SuggestionOverlay for GhostTextOverlay {
    fn show(&mut self, text: &str, anchor: CaretAnchor) {
        self.state.visible = true;
        self.state.text = text.to_string();
        self.state.anchor = Some(anchor);
    }

    fn hide(&mut self) {
        self.state = OverlayState::default();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;

    use super::*;

    /// Rows of the buffer with trailing blanks trimmed.
    fn buffer_rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                let row: String = (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect();
                row.trim_end().to_string()
            })
            .collect()
    }

    #[test]
    fn renders_ghost_text_at_the_anchor() {
        let mut overlay = GhostTextOverlay::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 24, 1));
        buf.set_stringn(0, 0, "Hello", 24, Style::default());

        overlay.show(" world", CaretAnchor { x: 5, y: 0 });
        overlay.render(&mut buf);

        insta::assert_snapshot!(buffer_rows(&buf).join("\n"), @"Hello world");
        assert_eq!(
            buf[(6, 0)].style().fg,
            Some(Color::DarkGray),
            "ghost text must be visually de-emphasized"
        );
        assert_eq!(buf[(0, 0)].style().fg, None, "real text is untouched");
    }

    #[test]
    fn hidden_overlay_renders_nothing() {
        let mut overlay = GhostTextOverlay::default();
        overlay.show("ghost", CaretAnchor { x: 0, y: 0 });
        overlay.hide();

        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 1));
        overlay.render(&mut buf);
        assert_eq!(buffer_rows(&buf), vec![""]);
        assert_eq!(overlay.state(), &OverlayState::default());
    }

    #[test]
    fn out_of_area_anchor_is_clipped_entirely() {
        let mut overlay = GhostTextOverlay::default();
        overlay.show("ghost", CaretAnchor { x: 10, y: 5 });

        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 2));
        overlay.render(&mut buf);
        assert_eq!(buffer_rows(&buf), vec![""; 2]);
    }

    #[test]
    fn long_suggestion_is_clipped_at_the_right_edge() {
        let mut overlay = GhostTextOverlay::default();
        overlay.show("abcdefghij", CaretAnchor { x: 4, y: 0 });

        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 1));
        overlay.render(&mut buf);
        assert_eq!(buffer_rows(&buf), vec!["    abcd"]);
    }
}
