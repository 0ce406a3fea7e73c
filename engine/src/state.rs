//! Suggestion lifecycle state owned exclusively by the engine.

use tokio::time::Instant;

use crate::provider::Tone;

/// A completion request that has been issued and not yet resolved.
///
/// At most one is tracked. A newer request logically supersedes an older one:
/// the older network call is not aborted, its eventual reply is simply
/// discarded because its `source_text` no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub source_text: String,
    pub tone: Tone,
    pub issued_at: Instant,
}

/// A completion the user can currently see.
///
/// `source_text` is the exact observed text that produced it. The suggestion is
/// valid for display only while the target's text still equals `source_text`;
/// any detected change invalidates it immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub source_text: String,
}

/// Where the engine is in the request/display cycle.
///
/// `Idle` — nothing outstanding, nothing shown. `Awaiting` — one request in
/// flight. `Suggested` — one suggestion displayed. There is no suggestion
/// queue: entering `Awaiting` supersedes any prior request, and only one
/// suggestion exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum EnginePhase {
    Idle,
    Awaiting(PendingRequest),
    Suggested(Suggestion),
}
