//! Gateway to the external text-generation service (Gemini).
//!
//! Both operations degrade to safe defaults instead of propagating errors:
//! a missing credential means the feature is unavailable, and any transport
//! or parse failure is logged and replaced with a fixed fallback. Nothing in
//! this module is ever surfaced to the user as an error state.

use serde_json::{Value, json};
use thiserror::Error;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Single fallback tag for transport/API failures and empty responses.
const FALLBACK_TAG: &str = "VibeCoding";
/// Fixed pair substituted when the tag response is not valid JSON.
const FALLBACK_TAG_PAIR: [&str; 2] = ["VibeCoding", "React"];

#[derive(Debug, Error)]
enum GenerationError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("generation API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("generation API response carried no candidate text")]
    EmptyResponse,
}

/// Client for the generation endpoint. No retry, no backoff, no explicit
/// timeout; a hung call rides on the transport's own limits.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GenerationClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads the credential from the environment. Its absence is non-fatal;
    /// the gateway then answers every call with its default value.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("{API_KEY_ENV} is not set, generation features are unavailable");
        }
        Self::new(api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generates a 1–2 sentence description of the artifact from its
    /// generation prompt. Returns an empty string when no credential is
    /// configured or when the call fails for any reason.
    pub async fn generate_description(&self, prompt_text: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return String::new();
        };

        let instruction = format!(
            "You are an expert technical writer.\n\
             Analyze the following \"Vibe Coding\" prompt which was used to generate a web application.\n\
             \n\
             PROMPT:\n\
             {prompt_text}\n\
             \n\
             TASK:\n\
             Write a short, professional, and catchy description (max 2 sentences) of what this application does based on the prompt.\n\
             Focus on the functionality and tech stack if mentioned. Do not mention \"the user asked for\"."
        );

        match self.generate_content(api_key, &instruction, false).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("error generating description: {err}");
                String::new()
            }
        }
    }

    /// Suggests up to 4 keyword tags for the prompt, requested as a JSON
    /// response. Returns an empty sequence when no credential is configured
    /// and a single fallback tag on transport/API failure.
    pub async fn generate_tags(&self, prompt_text: &str) -> Vec<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        let instruction = format!(
            "Extract up to 4 technical keywords or category tags from this prompt. Return JSON only.\n\
             \n\
             PROMPT:\n\
             {prompt_text}"
        );

        match self.generate_content(api_key, &instruction, true).await {
            Ok(text) => parse_tags_payload(&text),
            Err(GenerationError::EmptyResponse) => vec![FALLBACK_TAG.to_string()],
            Err(err) => {
                tracing::error!("error generating tags: {err}");
                vec![FALLBACK_TAG.to_string()]
            }
        }
    }

    /// One round-trip against the `generateContent` endpoint, returning the
    /// concatenated candidate text.
    async fn generate_content(
        &self,
        api_key: &str,
        instruction: &str,
        json_response: bool,
    ) -> Result<String, GenerationError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": instruction }] }],
        });
        if json_response {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let url = format!("{API_BASE_URL}/models/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let payload: Value = response.json().await?;
        let text = extract_candidate_text(&payload);
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Pulls `candidates[0].content.parts[*].text` out of a `generateContent`
/// response, concatenated in order.
fn extract_candidate_text(payload: &Value) -> String {
    let Some(parts) = payload
        .get("candidates")
        .and_then(|v| v.as_array())
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|v| v.as_array())
    else {
        return String::new();
    };

    parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
        .collect()
}

/// Tag response parsing ladder: a JSON array is taken directly, an object
/// with a `tags` array yields that field, any other object has its values
/// flattened into one sequence. Unparseable input falls back to the fixed
/// tag pair.
fn parse_tags_payload(raw: &str) -> Vec<String> {
    let Ok(parsed) = serde_json::from_str::<Value>(raw.trim()) else {
        return FALLBACK_TAG_PAIR.iter().map(|t| t.to_string()).collect();
    };

    match parsed {
        Value::Array(items) => string_items(&items),
        Value::Object(map) => {
            if let Some(Value::Array(tags)) = map.get("tags") {
                return string_items(tags);
            }
            map.values()
                .flat_map(|value| match value {
                    Value::Array(items) => string_items(items),
                    Value::String(s) => vec![s.clone()],
                    _ => Vec::new(),
                })
                .collect()
        }
        _ => FALLBACK_TAG_PAIR.iter().map(|t| t.to_string()).collect(),
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(|s| s.to_string()))
        .collect()
}
