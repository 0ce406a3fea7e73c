//! Restartable quiet-period timer for coalescing typing bursts.

use std::time::Duration;

use tokio::time::Instant;

/// How long the input must stay unchanged before a completion request fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Single pending deadline; restarting always replaces the previous one, so a
/// burst of text changes yields at most one expiry, timed from the last change.
#[derive(Debug, Default)]
pub(crate) struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub(crate) fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + DEBOUNCE_WINDOW);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Deadline for the host loop to sleep on, if one is armed.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline if it has passed. The host calls this after its
    /// sleep wakes up; taking the deadline here keeps "fired" a one-shot.
    pub(crate) fn take_expired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_deadline() {
        let mut timer = DebounceTimer::default();
        let start = Instant::now();
        timer.restart(start);

        tokio::time::advance(Duration::from_millis(300)).await;
        timer.restart(Instant::now());

        // The original deadline would have passed; the restarted one has not.
        tokio::time::advance(Duration::from_millis(300)).await;
        assert!(!timer.take_expired(Instant::now()));

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(timer.take_expired(Instant::now()));
        // One-shot: a second take sees nothing.
        assert!(!timer.take_expired(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms_the_timer() {
        let mut timer = DebounceTimer::default();
        timer.restart(Instant::now());
        timer.cancel();
        assert_eq!(timer.deadline(), None);

        tokio::time::advance(DEBOUNCE_WINDOW).await;
        assert!(!timer.take_expired(Instant::now()));
    }
}
