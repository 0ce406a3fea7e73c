//! OpenAI-backed completion provider.
//!
//! Implements [`CompletionProvider`] against the chat-completions endpoint. The
//! prompt instructs the model to continue the user's sentence in the configured
//! tone without repeating the prefix; `max_tokens` is kept small so suggestions
//! stay short and natural. A missing API key short-circuits before any network
//! I/O, and every failure mode maps onto the engine's [`CompletionError`]
//! taxonomy so the engine never has to understand HTTP.

use ghosttype_engine::CompletionError;
use ghosttype_engine::CompletionProvider;
use ghosttype_engine::CompletionRequest;
use ghosttype_engine::SettingsStore;
use ghosttype_engine::Tone;
use serde::Deserialize;
use serde::Serialize;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Cap on suggestion length; long completions read as noise in an input box.
const MAX_COMPLETION_TOKENS: u32 = 40;
const TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Provider configured from the persistent settings store.
    pub fn from_settings(settings: &SettingsStore) -> anyhow::Result<Self> {
        Ok(Self::new(settings.api_key()?, settings.model()?))
    }
}

impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let Some(api_key) = &self.api_key else {
            return Err(CompletionError::MissingApiKey);
        };

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(request.tone),
                },
                ChatMessage {
                    role: "user",
                    content: request.text,
                },
            ],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|err| err.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(%status, "completion request rejected by provider");
            return Err(CompletionError::Api(message));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::Api(format!("unreadable response body: {err}")))?;
        extract_completion(parsed)
    }
}

fn system_prompt(tone: Tone) -> String {
    format!(
        "You are a helpful writing assistant. Your task is to complete the user's sentence. \
         The completion should be in a {tone} tone. Provide ONLY the text that completes the \
         sentence, without repeating the user's original text. Keep the completion concise \
         and natural."
    )
}

/// Any response lacking a usable (non-empty) completion is an error, whatever
/// the transport said.
fn extract_completion(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| CompletionError::Api("response contained no completion".to_string()))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn missing_api_key_short_circuits_without_network() {
        let provider = OpenAiProvider::new(None, "gpt-4o-mini".to_string());
        let result = provider
            .complete(CompletionRequest {
                text: "Hello".to_string(),
                tone: Tone::Casual,
            })
            .await;
        assert_eq!(result, Err(CompletionError::MissingApiKey));
    }

    #[test]
    fn system_prompt_carries_the_tone() {
        let prompt = system_prompt(Tone::Formal);
        assert!(prompt.contains("in a Formal tone"));
        assert!(prompt.contains("without repeating the user's original text"));
    }

    #[test]
    fn request_body_serializes_expected_fields() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "I think we should".to_string(),
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 40);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "I think we should");
    }

    #[test]
    fn completion_is_trimmed() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  meet tomorrow. \n"}}]}"#,
        )
        .expect("parse");
        assert_eq!(
            extract_completion(response),
            Ok("meet tomorrow.".to_string())
        );
    }

    #[test]
    fn empty_or_absent_completion_is_an_error() {
        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).expect("parse");
        assert!(matches!(
            extract_completion(empty),
            Err(CompletionError::Api(_))
        ));

        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("parse");
        assert!(matches!(
            extract_completion(no_choices),
            Err(CompletionError::Api(_))
        ));
    }

    #[test]
    fn provider_error_body_parses() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        )
        .expect("parse");
        assert_eq!(
            body.error.map(|err| err.message).as_deref(),
            Some("Incorrect API key provided")
        );
    }
}
