//! Core of the ghosttype suggestion overlay engine.
//!
//! The engine augments an externally-owned text input with AI-generated inline
//! completions ("ghost text"). Keystrokes, mutations of the host-owned input,
//! and asynchronous completion replies all arrive on their own schedules; the
//! engine reconciles them into one consistent visible state without ever
//! corrupting the real input or surfacing a stale suggestion.
//!
//! The host owns the input widget and the event loop; the engine is handed the
//! input by reference behind [`TargetSurface`] and drives a [`SuggestionOverlay`]
//! it also does not render itself. All state transitions are synchronous; the
//! only suspension point is the completion-provider call, which runs on a
//! spawned task and reports back through the [`EngineEvent`] channel.

mod debounce;
mod engine;
mod event;
mod provider;
mod settings;
mod state;
mod surface;

pub use debounce::DEBOUNCE_WINDOW;
pub use engine::KeyIntent;
pub use engine::KeyOutcome;
pub use engine::POLL_INTERVAL;
pub use engine::SuggestionEngine;
pub use event::EngineEvent;
pub use event::EngineEventSender;
pub use provider::CompletionError;
pub use provider::CompletionProvider;
pub use provider::CompletionRequest;
pub use provider::Tone;
pub use settings::DEFAULT_MODEL;
pub use settings::SettingsStore;
pub use state::EnginePhase;
pub use state::PendingRequest;
pub use state::Suggestion;
pub use surface::CaretAnchor;
pub use surface::SuggestionOverlay;
pub use surface::TargetSurface;
