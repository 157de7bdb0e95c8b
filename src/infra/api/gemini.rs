//! Google Gemini (Generative Language API) による記事の書き換え

use super::http::HttpClient;
use crate::domain::rewrite::{Rewriter, REWRITE_MAX_OUTPUT_TOKENS, REWRITE_TEMPERATURE};
use crate::types::{InfraError, InfraResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// generateContent のレスポンスから生成テキストを取り出す
pub fn parse_generate_response(body: &str) -> InfraResult<String> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| InfraError::serialization("Geminiレスポンスの解析", e))?;

    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Err(InfraError::unexpected_response(message));
    }

    json.get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            InfraError::unexpected_response(
                "candidates[0].content.parts[0].text がレスポンスにありません",
            )
        })
}

/// Gemini API を使った書き換えクライアント
pub struct GeminiRewriter {
    http: Arc<dyn HttpClient>,
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
}

impl GeminiRewriter {
    pub fn new(http: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// generateContent のリクエスト本文を組み立てる
    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                {
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": REWRITE_TEMPERATURE,
                "maxOutputTokens": REWRITE_MAX_OUTPUT_TOKENS,
            }
        })
    }
}

#[async_trait]
impl Rewriter for GeminiRewriter {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        let body = Self::build_request_body(prompt);

        let response = self
            .http
            .post_json(&url, &[("key", self.api_key.as_str())], &body, self.timeout_secs)
            .await
            .context("Gemini APIへのリクエストに失敗")?;

        let text = parse_generate_response(&response)?;
        debug!(model = %self.model, chars = text.chars().count(), "Gemini書き換え完了");
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::api::http::MockHttpClient;

    const SUCCESS: &str = r#"{
        "candidates": [
            {"content": {"parts": [{"text": "  Wczoraj w Sejmie odbyła się debata.  "}], "role": "model"}}
        ]
    }"#;

    #[test]
    fn test_parse_success() {
        assert_eq!(
            parse_generate_response(SUCCESS).unwrap(),
            "  Wczoraj w Sejmie odbyła się debata.  "
        );
    }

    #[test]
    fn test_parse_error_body() {
        let err = parse_generate_response(r#"{"error": {"code": 400, "message": "API key not valid"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_parse_without_candidates() {
        assert!(parse_generate_response(r#"{"candidates": []}"#).is_err());
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_config() -> Result<(), anyhow::Error> {
        let http = Arc::new(MockHttpClient::new_success(SUCCESS));
        let rewriter = GeminiRewriter::new(http.clone(), "klucz")
            .with_model("models/gemini-test")
            .with_base_url("http://mock");

        let text = rewriter.rewrite("Debata", "Opis debaty").await?;
        assert_eq!(text, "Wczoraj w Sejmie odbyła się debata.");

        let requests = http.requests();
        assert_eq!(
            requests[0].url,
            "http://mock/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(requests[0].query_value("key"), Some("klucz"));

        let body = requests[0].body.as_ref().expect("本文が送られていない");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Tytuł: Debata"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_propagates_failure() {
        let http = Arc::new(MockHttpClient::new_error("quota exceeded"));
        let rewriter = GeminiRewriter::new(http, "klucz");

        let err = rewriter.generate("prompt").await.unwrap_err();
        assert!(format!("{:#}", err).contains("quota exceeded"));
    }
}
