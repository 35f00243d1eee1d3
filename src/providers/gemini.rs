use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    core::errors::{AppError, AppResult},
    generation::{prompts::connection_probe_prompt, ContentGenerator, GenerationCredentials},
};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Models offered in the model picker. Any other name is passed through.
pub const KNOWN_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
    "gemini-2.5-flash",
];

const PROBE_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> AppResult<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends one `generateContent` call constrained to JSON output and
    /// returns the first candidate's text.
    pub async fn generate_json(
        &self,
        credentials: &GenerationCredentials,
        prompt: &str,
        response_schema: Option<&Value>,
    ) -> AppResult<String> {
        let endpoint = format!("{}/models/{}:generateContent", self.base_url, credentials.model);
        let mut generation_config = serde_json::json!({
            "temperature": 0.7,
            "responseMimeType": "application/json"
        });
        if let Some(schema) = response_schema {
            generation_config["responseSchema"] = schema.clone();
        }
        let payload = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{"text": prompt}]
                }
            ],
            "generationConfig": generation_config
        });

        debug!(model = %credentials.model, prompt_chars = prompt.len(), "calling gemini");
        let response = self
            .http
            .post(endpoint)
            .header("x-goog-api-key", &credentials.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AppError::ProviderAuth),
            StatusCode::TOO_MANY_REQUESTS => return Err(AppError::ProviderRateLimited),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, "gemini returned an error status");
                return Err(AppError::ProviderInvalidResponse(format!(
                    "status {status} body {body}"
                )));
            }
            _ => {}
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| AppError::ProviderInvalidResponse(err.without_url().to_string()))?;
        candidate_text(&body)
    }

    /// Round trip with a trivial prompt; returns the start of the reply.
    pub async fn test_connection(&self, credentials: &GenerationCredentials) -> AppResult<String> {
        let text = self
            .generate_json(credentials, &connection_probe_prompt(), None)
            .await?;
        Ok(text.chars().take(PROBE_PREVIEW_CHARS).collect())
    }
}

/// reqwest errors carry the request URL; it is stripped before the message
/// reaches logs or clients.
fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::ProviderTimeout
    } else {
        AppError::Network(err.without_url().to_string())
    }
}

fn candidate_text(body: &Value) -> AppResult<String> {
    body.get("candidates")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| AppError::ProviderInvalidResponse("missing text candidate".to_string()))
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(
        &self,
        credentials: &GenerationCredentials,
        instruction: &str,
        response_schema: &Value,
    ) -> AppResult<String> {
        self.generate_json(credentials, instruction, Some(response_schema))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn candidate_text_reads_first_part() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":1}"}]}}]
        });
        assert_eq!(candidate_text(&body).expect("text"), "{\"a\":1}");
    }

    #[test]
    fn missing_candidate_is_invalid_response() {
        let err = candidate_text(&json!({"candidates": []})).expect_err("no candidate");
        assert_eq!(err.code(), "PROVIDER_INVALID_RESPONSE");
    }

    #[tokio::test]
    async fn transport_errors_never_echo_the_api_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = GeminiClient::with_base_url(&format!("http://{addr}/v1beta")).expect("client");
        let credentials = GenerationCredentials {
            api_key: "AIza-secret-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
        };
        let err = client
            .generate_json(&credentials, "ping", None)
            .await
            .expect_err("nothing is listening");
        assert!(err.is_generation_transport());
        assert!(!err.to_string().contains("AIza-secret-key"));
    }
}
