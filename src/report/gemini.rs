use super::TextGenerator;
use crate::config::Config;
use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client REST `generateContent` du moteur Gemini
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Self {
        // Sans builder valide, on retombe sur un client sans délai maximal
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Self {
            http,
            api_key,
            model,
            base_url: API_BASE.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key(),
            config.gemini_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn extract_text(body: &Value) -> String {
        body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("API Key is missing");
        };

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let request = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .context("requête au moteur d'analyse")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("réponse illisible du moteur d'analyse")?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            bail!("provider error {}: {}", status, message);
        }

        Ok(Self::extract_text(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let client = GeminiClient::new(None, "gemini-2.5-flash".into(), Duration::from_secs(1))
            // Adresse injoignable: l'appel ne doit même pas être tenté
            .with_base_url("http://127.0.0.1:9");

        let err = client.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "API Key is missing");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "## Executive" }, { "text": " Summary" }] } }]
        });
        assert_eq!(GeminiClient::extract_text(&body), "## Executive Summary");
        assert_eq!(GeminiClient::extract_text(&json!({})), "");
    }
}
