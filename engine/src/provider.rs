//! Contract between the engine and the completion provider.
//!
//! The provider is an external collaborator: given a text prefix and a tone it
//! asynchronously returns either a completion string or a failure reason. The
//! engine treats any reply without a usable completion as an error, regardless
//! of cause, and never retries on its own; the next natural pause in typing
//! re-triggers the pipeline.

use std::future::Future;

/// Style label passed to the provider to bias generated text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
pub enum Tone {
    #[default]
    Casual,
    Formal,
    Friendly,
    Professional,
}

impl Tone {
    /// Parses a stored tone label. Returns `None` for unknown values so callers
    /// can decide how to fall back.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Casual" => Some(Tone::Casual),
            "Formal" => Some(Tone::Formal),
            "Friendly" => Some(Tone::Friendly),
            "Professional" => Some(Tone::Professional),
            _ => None,
        }
    }
}

/// A single completion request: the exact prefix the user has typed plus the
/// configured tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub text: String,
    pub tone: Tone,
}

/// Why a completion request produced no suggestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Credential absent; the provider short-circuits before any network I/O.
    #[error("API Key is not set in the ghosttype settings")]
    MissingApiKey,

    /// The provider answered, but with a non-success response or an unusable
    /// body. Carries the provider's human-readable reason.
    #[error("API Error: {0}")]
    Api(String),

    /// The request never reached the provider (offline, DNS, TLS, ...).
    #[error("Network error or could not connect to the API ({0})")]
    Network(String),
}

/// Asynchronous completion source.
///
/// Implementations are cloned into a spawned task per request, so they must be
/// cheap to clone (hold clients behind `Arc`/`reqwest::Client` style handles).
pub trait CompletionProvider: Clone + Send + Sync + 'static {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
