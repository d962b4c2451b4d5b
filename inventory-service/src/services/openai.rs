//! Client for the OpenAI-compatible API: chat completions (text and
//! vision) and audio transcription. Transient upstream failures are retried
//! with exponential backoff; response shaping tolerates models that wrap
//! their JSON in prose.

use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use service_core::retry::{RetryPolicy, send_with_retry};
use std::time::{Duration, Instant};

use crate::config::OpenAiConfig;
use crate::models::ItemSuggestion;

const TEMPERATURE: f32 = 0.2;

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    text_timeout: Duration,
    media_timeout: Duration,
    text_retry: RetryPolicy,
    media_retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Parts(parts),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Raw model output plus the wall-clock latency of the call, retries and
/// backoff included.
#[derive(Debug)]
pub struct ChatOutcome {
    pub content: String,
    pub latency_ms: u64,
}

#[derive(Debug)]
pub struct TranscribeOutcome {
    pub text: String,
    pub latency_ms: u64,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            text_timeout: Duration::from_millis(config.text_timeout_ms),
            media_timeout: Duration::from_millis(config.media_timeout_ms),
            text_retry: RetryPolicy::with_base_backoff(Duration::from_millis(400)),
            media_retry: RetryPolicy::with_base_backoff(Duration::from_millis(500)),
        })
    }

    pub async fn chat_text(
        &self,
        model: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<ChatOutcome, AppError> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
        self.chat(model, &messages, max_tokens, self.text_timeout, &self.text_retry)
            .await
    }

    pub async fn chat_vision(
        &self,
        model: &str,
        system: &str,
        parts: Vec<ContentPart>,
        max_tokens: u32,
    ) -> Result<ChatOutcome, AppError> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user_parts(parts)];
        self.chat(model, &messages, max_tokens, self.media_timeout, &self.media_retry)
            .await
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
        timeout: Duration,
        retry: &RetryPolicy,
    ) -> Result<ChatOutcome, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages,
            max_tokens,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let started = Instant::now();
        let response = send_with_retry(retry, "chat_completion", || {
            self.http
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .timeout(timeout)
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| AppError::BadGateway(format!("Upstream request failed: {}", e)))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(status.as_u16(), text));
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            AppError::BadGateway(format!("Invalid upstream response: {}", e))
        })?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());

        Ok(ChatOutcome { content, latency_ms })
    }

    pub async fn transcribe(
        &self,
        model: &str,
        filename: &str,
        content_type: &str,
        audio: Vec<u8>,
    ) -> Result<TranscribeOutcome, AppError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let started = Instant::now();

        let response = send_with_retry(&self.media_retry, "audio_transcription", || {
            let part = multipart::Part::bytes(audio.clone()).file_name(filename.to_string());
            // Fall back to a raw byte part when the content type is not a
            // parseable MIME string.
            let part = part.mime_str(content_type).unwrap_or_else(|_| {
                multipart::Part::bytes(audio.clone()).file_name(filename.to_string())
            });
            let form = multipart::Form::new()
                .part("file", part)
                .text("model", model.to_string())
                .text("response_format", "json");
            self.http
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .timeout(self.media_timeout)
                .multipart(form)
                .send()
        })
        .await
        .map_err(|e| AppError::BadGateway(format!("Upstream request failed: {}", e)))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(status.as_u16(), text));
        }

        let data: TranscriptionResponse = response.json().await.map_err(|e| {
            AppError::BadGateway(format!("Invalid transcription response: {}", e))
        })?;

        Ok(TranscribeOutcome {
            text: data.text,
            latency_ms,
        })
    }
}

/// The substring from the first `{` to the last `}`, for model output that
/// wrapped its JSON object in prose or code fencing.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parses model output as JSON, falling back to the embedded-object
/// substring. Returns `Value::Null` when nothing parses.
fn parse_items_payload(content: &str) -> Value {
    serde_json::from_str(content)
        .ok()
        .or_else(|| extract_json_object(content).and_then(|s| serde_json::from_str(s).ok()))
        .unwrap_or(Value::Null)
}

/// Shapes an `{"items": [...]}` payload into trimmed, non-empty strings,
/// capped at `max_items`. Unparseable output yields an empty list, never an
/// error.
pub fn shape_string_items(content: &str, max_items: usize) -> Vec<String> {
    let parsed = parse_items_payload(content);
    let Some(items) = parsed.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .take(max_items)
        .collect()
}

/// Shapes vision output into at most 20 sanitized suggestions. Entries
/// without a string `name` are dropped; `category` and `confidence` are
/// optional.
pub fn sanitize_suggestions(content: &str) -> Vec<ItemSuggestion> {
    let parsed = parse_items_payload(content);
    let Some(items) = parsed.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|raw| {
            let name = clip(raw.get("name")?.as_str()?, 80);
            Some(ItemSuggestion {
                name,
                category: raw
                    .get("category")
                    .and_then(Value::as_str)
                    .map(|c| clip(c, 40)),
                confidence: raw
                    .get("confidence")
                    .and_then(Value::as_f64)
                    .map(|c| c.clamp(0.0, 1.0)),
            })
        })
        .take(20)
        .collect()
}

fn clip(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_embedded_json_object() {
        assert_eq!(
            extract_json_object("Sure! Here you go: {\"items\":[]} Hope that helps."),
            Some("{\"items\":[]}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("}{"), None);
    }

    #[test]
    fn embedded_extraction_spans_first_to_last_brace() {
        // Nested objects must survive the substring cut.
        let raw = "prefix {\"items\":[{\"name\":\"Lamp\"}]} suffix";
        let slice = extract_json_object(raw).unwrap();
        assert_eq!(slice, "{\"items\":[{\"name\":\"Lamp\"}]}");
    }

    #[test]
    fn shapes_clean_items_payload() {
        let items = shape_string_items("{\"items\":[\" milk \",\"bread\",\"\",\"eggs\"]}", 30);
        assert_eq!(items, vec!["milk", "bread", "eggs"]);
    }

    #[test]
    fn shapes_prose_wrapped_payload() {
        let items = shape_string_items("Here is the JSON: {\"items\":[\"milk\"]} done", 30);
        assert_eq!(items, vec!["milk"]);
    }

    #[test]
    fn caps_items_at_limit() {
        let content = "{\"items\":[\"a\",\"b\",\"c\"]}";
        assert_eq!(shape_string_items(content, 1), vec!["a"]);
    }

    #[test]
    fn non_string_items_are_dropped() {
        let items = shape_string_items("{\"items\":[1,\"milk\",null,{\"x\":1}]}", 30);
        assert_eq!(items, vec!["milk"]);
    }

    #[test]
    fn garbage_yields_empty_list() {
        assert!(shape_string_items("total nonsense", 30).is_empty());
        assert!(shape_string_items("{\"other\":[]}", 30).is_empty());
        assert!(shape_string_items("{}", 30).is_empty());
    }

    #[test]
    fn sanitizes_suggestions() {
        let content = r#"{"items":[
            {"name":"Lamp","category":"Lighting","confidence":0.9},
            {"name":"Sofa","confidence":1.7},
            {"category":"Furniture","confidence":0.5},
            {"name":"Rug","category":"Rug/Carpet","confidence":-0.2}
        ]}"#;
        let items = sanitize_suggestions(content);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Lamp");
        assert_eq!(items[0].category.as_deref(), Some("Lighting"));
        assert_eq!(items[0].confidence, Some(0.9));
        // Confidence clamps into 0..=1
        assert_eq!(items[1].confidence, Some(1.0));
        assert_eq!(items[1].category, None);
        assert_eq!(items[2].confidence, Some(0.0));
    }

    #[test]
    fn clips_long_names_and_categories() {
        let long_name = "x".repeat(200);
        let content = format!(
            "{{\"items\":[{{\"name\":\"{}\",\"category\":\"{}\"}}]}}",
            long_name, long_name
        );
        let items = sanitize_suggestions(&content);
        assert_eq!(items[0].name.chars().count(), 80);
        assert_eq!(items[0].category.as_ref().unwrap().chars().count(), 40);
    }

    #[test]
    fn suggestions_cap_at_twenty() {
        let entries: Vec<String> = (0..25)
            .map(|i| format!("{{\"name\":\"item {}\"}}", i))
            .collect();
        let content = format!("{{\"items\":[{}]}}", entries.join(","));
        assert_eq!(sanitize_suggestions(&content).len(), 20);
    }

    #[test]
    fn vision_message_serializes_with_typed_parts() {
        let message = ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: "look".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "https://example.com/x.jpg".to_string(),
                },
            },
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(
            value["content"][1]["image_url"]["url"],
            "https://example.com/x.jpg"
        );
    }
}
