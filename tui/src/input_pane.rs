//! The host-owned message input pane.
//!
//! This is the "target element" the suggestion engine observes and augments:
//! the host application creates it, destroys it when the user navigates away,
//! and recreates it for a new conversation. It is deliberately a minimal
//! single-line editor; the engine only ever reads its rendered text and
//! appends accepted suggestions to the end.

use std::cell::Cell;

use ghosttype_engine::CaretAnchor;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Default)]
pub struct MessageInput {
    text: String,
    /// Byte offset of the caret, always on a grapheme boundary.
    cursor: usize,
    /// Area of the most recent render; caret geometry derives from it.
    last_area: Cell<Option<Rect>>,
}

impl MessageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) {
        let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).last() else {
            return;
        };
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).last() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(grapheme) = self.text[self.cursor..].graphemes(true).next() {
            self.cursor += grapheme.len();
        }
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Append to the end of the content and move the caret to the end. This is
    /// how accepted suggestions are committed.
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
        self.move_to_end();
    }

    /// Take the full text out (submit), leaving an empty input behind.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Columns occupied by the text before the caret.
    fn caret_column(&self) -> u16 {
        self.text[..self.cursor].width().min(u16::MAX as usize) as u16
    }

    /// Horizontal scroll keeping the caret inside `width` columns.
    fn scroll_for(&self, width: u16) -> u16 {
        let caret = self.caret_column();
        caret.saturating_sub(width.saturating_sub(1))
    }

    /// Screen cell immediately following the caret, based on the last render.
    /// `None` until the pane has been rendered at least once, or when the pane
    /// was last rendered into a degenerate area.
    pub fn caret_anchor(&self) -> Option<CaretAnchor> {
        let area = self.last_area.get()?;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let col = self.caret_column() - self.scroll_for(area.width);
        if col >= area.width {
            return None;
        }
        Some(CaretAnchor {
            x: area.x + col,
            y: area.y,
        })
    }

    /// Terminal cursor position; identical to the caret anchor.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        self.caret_anchor().map(|anchor| (anchor.x, anchor.y))
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        self.last_area.set(Some(area));
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Skip whole graphemes up to the scroll offset so the caret stays
        // visible while the text overflows the pane.
        let scroll = self.scroll_for(area.width) as usize;
        let mut skipped = 0usize;
        let visible: String = self
            .text
            .graphemes(true)
            .skip_while(|grapheme| {
                if skipped < scroll {
                    skipped += grapheme.width();
                    true
                } else {
                    false
                }
            })
            .collect();
        buf.set_stringn(
            area.x,
            area.y,
            &visible,
            area.width as usize,
            Style::default(),
        );
    }
}
