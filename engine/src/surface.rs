//! Seams between the engine and the host-owned UI.
//!
//! The target input belongs to the host application: the engine only ever reads
//! its rendered text and appends accepted suggestions back into it. Likewise the
//! overlay is a purely decorative element the host renders; the engine tells it
//! what to show and where, nothing more.

/// Screen cell immediately following the caret inside the target input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretAnchor {
    pub x: u16,
    pub y: u16,
}

/// Borrowed handle to the externally-owned editable input.
///
/// The target is created and destroyed by the host (e.g. when the user switches
/// conversations), so every read can observe it missing. `read_text` returning
/// `None` means "no target right now" and is an expected, recurring condition,
/// not an error.
pub trait TargetSurface {
    /// Current rendered text of the target, or `None` when the target is absent.
    fn read_text(&self) -> Option<String>;

    /// Append `text` to the end of the target's content and move the caret to
    /// the end. Returns `false` when the target is absent.
    fn append_text(&mut self, text: &str) -> bool;

    /// Screen position just after the caret, if it can be resolved.
    fn caret_anchor(&self) -> Option<CaretAnchor>;

    /// Whether keyboard focus is currently inside the target.
    fn has_focus(&self) -> bool;
}

/// Visual ghost-text element owned by the host renderer.
///
/// Implementations must be pure decoration: never intercept input, never take
/// focus, never mutate text. Overlay state is derived from the engine's current
/// suggestion and recomputed whenever the engine says so; it is never
/// authoritative.
pub trait SuggestionOverlay {
    /// Show `text` anchored at `anchor`, replacing whatever was shown before.
    /// Repositioning is the same call with a new anchor.
    fn show(&mut self, text: &str, anchor: CaretAnchor);

    /// Hide the overlay entirely.
    fn hide(&mut self);
}
