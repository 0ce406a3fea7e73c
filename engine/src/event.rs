//! Events the engine posts back into the host's event loop.

use tokio::sync::mpsc::UnboundedSender;

use crate::provider::CompletionError;

#[derive(Debug)]
pub enum EngineEvent {
    /// Result of a completed asynchronous completion request. `source_text`
    /// echoes the exact text the request was issued for so the engine can
    /// decide whether the result is still relevant when it finally arrives.
    CompletionResult {
        source_text: String,
        result: Result<String, CompletionError>,
    },
}

/// Sending half of the engine event channel.
///
/// Using a channel for provider replies (rather than awaiting them in place)
/// keeps every state transition synchronous: the reply re-enters the engine as
/// an ordinary event on the host's single-threaded loop.
#[derive(Clone, Debug)]
pub struct EngineEventSender {
    tx: UnboundedSender<EngineEvent>,
}

impl EngineEventSender {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }

    /// Send an event to the host loop. Failure means the loop is shutting
    /// down, which is fine to ignore beyond a log line.
    pub fn send(&self, event: EngineEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::error!("failed to send engine event: {err}");
        }
    }
}
