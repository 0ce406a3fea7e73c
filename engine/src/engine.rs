//! The coordinating authority over suggestions.
//!
//! `SuggestionEngine` owns the observed text, the current phase
//! ([`EnginePhase`]), and the debounce timer. The host's single-threaded event
//! loop drives it: a 200 ms poll reads the target, a quiet period fires at most
//! one completion request, the reply re-enters through [`EngineEvent`], and the
//! host offers accept/dismiss keys for first refusal. Every method here runs to
//! completion synchronously, so there is no interleaving between target reads,
//! state transitions, and overlay updates.

use std::time::Duration;

use tokio::time::Instant;

use crate::debounce::DebounceTimer;
use crate::event::EngineEvent;
use crate::event::EngineEventSender;
use crate::provider::CompletionError;
use crate::provider::CompletionProvider;
use crate::provider::CompletionRequest;
use crate::provider::Tone;
use crate::state::EnginePhase;
use crate::state::PendingRequest;
use crate::state::Suggestion;
use crate::surface::SuggestionOverlay;
use crate::surface::TargetSurface;

/// Cadence at which the target's text is sampled. The host input does not emit
/// reliable change notifications, so the engine diffs by value on a timer.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// What the user asked the engine to do with the visible suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Accept,
    Dismiss,
}

/// Whether the engine acted on a key. `Consumed` means the host must suppress
/// its own handling of the key (the Tab must not move focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

pub struct SuggestionEngine<P> {
    provider: P,
    event_tx: EngineEventSender,
    tone: Tone,
    /// Last text read from the target. Compared by value on every poll.
    observed_text: String,
    phase: EnginePhase,
    debounce: DebounceTimer,
}

impl<P: CompletionProvider> SuggestionEngine<P> {
    pub fn new(provider: P, tone: Tone, event_tx: EngineEventSender) -> Self {
        Self {
            provider,
            event_tx,
            tone,
            observed_text: String::new(),
            phase: EnginePhase::Idle,
            debounce: DebounceTimer::default(),
        }
    }

    pub fn phase(&self) -> &EnginePhase {
        &self.phase
    }

    pub fn observed_text(&self) -> &str {
        &self.observed_text
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    /// One detector step, run on the poll cadence.
    ///
    /// An absent target is an expected condition (the host destroys the input
    /// while navigating): the engine degrades to `Idle` and hides the overlay
    /// rather than erroring. A changed text invalidates any displayed
    /// suggestion immediately and (re)starts the debounce window; unchanged
    /// text only refreshes the overlay position, which can move from resize or
    /// scroll without any edit.
    pub fn poll(&mut self, surface: &impl TargetSurface, overlay: &mut impl SuggestionOverlay) {
        let Some(current) = surface.read_text() else {
            self.debounce.cancel();
            if !self.phase.is_idle() {
                tracing::debug!("target absent, clearing suggestion state");
                self.phase = EnginePhase::Idle;
            }
            overlay.hide();
            return;
        };

        if current != self.observed_text {
            self.observed_text = current;
            // A suggestion is only ever valid for the exact text that
            // produced it.
            if self.phase.is_suggested() {
                overlay.hide();
                self.phase = EnginePhase::Idle;
            }
            if self.observed_text.trim().is_empty() {
                self.debounce.cancel();
            } else {
                self.debounce.restart(Instant::now());
            }
        } else if let EnginePhase::Suggested(suggestion) = &self.phase {
            match surface.caret_anchor() {
                Some(anchor) => overlay.show(&suggestion.text, anchor),
                None => overlay.hide(),
            }
        }
    }

    /// Deadline for the host loop's debounce sleep, if one is armed.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Called by the host when its debounce sleep wakes. Issues at most one
    /// completion request for the current text; empty or whitespace-only text
    /// issues none. The provider call runs on a spawned task and reports back
    /// through the event channel, superseding is handled by the source-text
    /// echo rather than by aborting the older call.
    pub fn on_debounce_elapsed(&mut self) {
        if !self.debounce.take_expired(Instant::now()) {
            return;
        }
        if self.observed_text.trim().is_empty() {
            return;
        }

        let source_text = self.observed_text.clone();
        self.phase = EnginePhase::Awaiting(PendingRequest {
            source_text: source_text.clone(),
            tone: self.tone,
            issued_at: Instant::now(),
        });

        let request = CompletionRequest {
            text: source_text.clone(),
            tone: self.tone,
        };
        let provider = self.provider.clone();
        let tx = self.event_tx.clone();
        tracing::debug!(chars = source_text.len(), tone = %self.tone, "issuing completion request");
        tokio::spawn(async move {
            let result = provider.complete(request).await;
            tx.send(EngineEvent::CompletionResult {
                source_text,
                result,
            });
        });
    }

    /// Consumes a provider reply delivered through the event channel.
    ///
    /// The staleness guard runs first and synchronously: a reply for text the
    /// user has since edited past never surfaces, however successful.
    pub fn handle_completion(
        &mut self,
        source_text: String,
        result: Result<String, CompletionError>,
        surface: &impl TargetSurface,
        overlay: &mut impl SuggestionOverlay,
    ) {
        if source_text != self.observed_text {
            // If this reply belonged to the tracked request, the request is
            // over; if it belonged to an older superseded one, the newer
            // request is still outstanding and the phase stays put.
            if matches!(&self.phase, EnginePhase::Awaiting(pending) if pending.source_text == source_text)
            {
                self.phase = EnginePhase::Idle;
            }
            tracing::debug!("discarding stale completion reply");
            return;
        }
        if !self.phase.is_awaiting() {
            tracing::debug!("discarding completion reply with no request outstanding");
            return;
        }

        match result {
            Ok(completion) => {
                match surface.caret_anchor() {
                    Some(anchor) => overlay.show(&completion, anchor),
                    None => overlay.hide(),
                }
                self.phase = EnginePhase::Suggested(Suggestion {
                    text: completion,
                    source_text,
                });
            }
            Err(err) => {
                // Surfaced but not retried; the user's next pause in typing
                // re-triggers the pipeline naturally.
                tracing::warn!("completion request failed: {err}");
                overlay.hide();
                self.phase = EnginePhase::Idle;
            }
        }
    }

    /// Offers a key to the engine before the host handles it.
    ///
    /// Acts only while a suggestion is displayed and focus is inside the
    /// target; everything else is `Ignored` so ordinary typing propagates
    /// untouched.
    pub fn handle_key(
        &mut self,
        intent: KeyIntent,
        surface: &mut impl TargetSurface,
        overlay: &mut impl SuggestionOverlay,
    ) -> KeyOutcome {
        let EnginePhase::Suggested(suggestion) = &self.phase else {
            return KeyOutcome::Ignored;
        };
        if !surface.has_focus() {
            return KeyOutcome::Ignored;
        }

        match intent {
            KeyIntent::Accept => {
                let text = suggestion.text.clone();
                if surface.append_text(&text) {
                    // Sync the observed text to the post-append content so the
                    // next poll does not treat the programmatic edit as user
                    // input and fire a fresh request for it.
                    self.observed_text = surface.read_text().unwrap_or_default();
                }
                overlay.hide();
                self.phase = EnginePhase::Idle;
                KeyOutcome::Consumed
            }
            KeyIntent::Dismiss => {
                overlay.hide();
                self.phase = EnginePhase::Idle;
                KeyOutcome::Consumed
            }
        }
    }
}
