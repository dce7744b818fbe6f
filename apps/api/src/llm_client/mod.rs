/// LLM Client — the single point of entry for all generateContent calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
///
/// Model: gemini-3-pro-preview (hardcoded — do not make configurable, the
/// grading rubric is calibrated against one model)
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod schema;

use schema::{Schema, SchemaError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all evaluation calls.
pub const MODEL: &str = "gemini-3-pro-preview";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("model returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the payload came back but did not match the bound schema —
    /// a prompt/schema mismatch rather than infrastructure flakiness.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            LlmError::Parse(_) | LlmError::Schema(_) | LlmError::EmptyContent
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Extracts the text of the first candidate part, if any.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by the feedback service.
/// Wraps the generateContent API with retry logic and schema-bound JSON
/// decoding.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw generateContent call bound to `response_schema`.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        content: &str,
        system_instruction: &str,
        response_schema: &Schema,
    ) -> Result<GenerateResponse, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: content }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff between the 3 attempts: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "generateContent attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("generateContent returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generate_response: GenerateResponse = response.json().await?;

            if let Some(usage) = &generate_response.usage_metadata {
                debug!(
                    "generateContent succeeded: prompt_tokens={}, candidate_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(generate_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and decodes the candidate text as JSON matching
    /// `response_schema`. The same descriptor that constrained the request
    /// validates the payload before typed deserialization, so a structurally
    /// wrong response surfaces as `LlmError::Schema`, never as a partial
    /// record. Schema violations are not retried.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        content: &str,
        system_instruction: &str,
        response_schema: &Schema,
    ) -> Result<T, LlmError> {
        let response = self
            .call(content, system_instruction, response_schema)
            .await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        decode_payload(text, response_schema)
    }
}

/// Decodes schema-bound candidate text into a typed record: strip fences,
/// parse, validate against the descriptor, then deserialize. Text that is
/// not JSON at all surfaces as `LlmError::Parse`.
fn decode_payload<T: DeserializeOwned>(
    text: &str,
    response_schema: &Schema,
) -> Result<T, LlmError> {
    // Schema-constrained output should be bare JSON, but strip fences in
    // case the model wraps it anyway
    let text = strip_json_fences(text);

    let value: Value = serde_json::from_str(text)?;
    response_schema.validate(&value)?;

    serde_json::from_value(value).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    fn band_schema() -> Schema {
        Schema::object(vec![("band", Schema::number())])
    }

    #[test]
    fn test_decode_payload_rejects_non_json_text() {
        // A refusal or apology instead of JSON must be a validation error,
        // never a panic or a partial record
        let err =
            decode_payload::<Value>("Sorry, I cannot help with that.", &band_schema()).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_decode_payload_rejects_truncated_json() {
        let err = decode_payload::<Value>(r#"{"band": 7."#, &band_schema()).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_decode_payload_rejects_schema_violating_json() {
        let err = decode_payload::<Value>(r#"{"band": "seven"}"#, &band_schema()).unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
    }

    #[test]
    fn test_decode_payload_accepts_fenced_valid_json() {
        let value: Value =
            decode_payload("```json\n{\"band\": 7.5}\n```", &band_schema()).unwrap();
        assert_eq!(value["band"], json!(7.5));
    }

    #[test]
    fn test_generate_response_text_takes_first_candidate_part() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\": 1}"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 34}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_generate_response_without_candidates_has_no_text() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_request_body_carries_schema_and_mime_type() {
        let schema = Schema::object(vec![("band", Schema::number())]);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: "be terse" }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
            },
        };
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(
            wire["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(wire["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "be terse");
        assert_eq!(wire["contents"][0]["parts"][0]["text"], "hello");
    }
}
