//! Watches the host view for the target input appearing and disappearing.
//!
//! The host's widget tree is dynamic: the chat input exists only while a
//! conversation view is mounted, and is destroyed/recreated as the user
//! navigates. While `Watching`, every structure change is inspected; on a
//! match the overlay element is built (once, lazily) and the engine's polling
//! and key hook become active. Once `Engaged` the watcher stops inspecting;
//! the poll loop itself tolerates the target vanishing, and reports the loss
//! back here so the watcher re-arms. A target that never appears simply leaves
//! the watcher in `Watching` forever; that is not an error.

use crate::overlay::GhostTextOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Watching,
    Engaged,
}

#[derive(Debug)]
pub struct TargetAcquisition {
    state: WatchState,
}

impl Default for TargetAcquisition {
    fn default() -> Self {
        Self {
            state: WatchState::Watching,
        }
    }
}

impl TargetAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polling and the key hook are live only while engaged.
    pub fn is_engaged(&self) -> bool {
        self.state == WatchState::Engaged
    }

    /// Called on every host structure change. Returns `true` when this change
    /// newly engaged the engine. Idempotent with respect to the overlay: an
    /// already-built overlay is reused across engage/disengage cycles.
    pub fn observe(&mut self, target_present: bool, overlay: &mut Option<GhostTextOverlay>) -> bool {
        if self.state == WatchState::Engaged || !target_present {
            return false;
        }
        if overlay.is_none() {
            *overlay = Some(GhostTextOverlay::default());
        }
        self.state = WatchState::Engaged;
        tracing::info!("target input acquired");
        true
    }

    /// A poll found the target gone: detach and resume watching. Returns
    /// `true` on an actual transition.
    pub fn on_target_lost(&mut self) -> bool {
        if self.state != WatchState::Engaged {
            return false;
        }
        self.state = WatchState::Watching;
        tracing::info!("target input lost, watching again");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engages_only_when_the_target_appears() {
        let mut acquisition = TargetAcquisition::new();
        let mut overlay = None;

        assert!(!acquisition.observe(false, &mut overlay));
        assert!(!acquisition.is_engaged());
        assert!(overlay.is_none());

        assert!(acquisition.observe(true, &mut overlay));
        assert!(acquisition.is_engaged());
        assert!(overlay.is_some());
    }

    #[test]
    fn engaging_is_one_shot_until_the_target_is_lost() {
        let mut acquisition = TargetAcquisition::new();
        let mut overlay = None;

        assert!(acquisition.observe(true, &mut overlay));
        // Further structure changes are ignored while engaged.
        assert!(!acquisition.observe(true, &mut overlay));

        assert!(acquisition.on_target_lost());
        assert!(!acquisition.on_target_lost());
        assert!(!acquisition.is_engaged());

        // Re-engaging reuses the overlay element instead of rebuilding it.
        let before = overlay.as_ref().map(std::ptr::from_ref);
        assert!(acquisition.observe(true, &mut overlay));
        let after = overlay.as_ref().map(std::ptr::from_ref);
        assert_eq!(before, after);
    }

    #[test]
    fn never_appearing_target_is_not_an_error() {
        let mut acquisition = TargetAcquisition::new();
        let mut overlay = None;
        for _ in 0..10 {
            assert!(!acquisition.observe(false, &mut overlay));
        }
        assert!(!acquisition.is_engaged());
        assert!(overlay.is_none());
    }
}
