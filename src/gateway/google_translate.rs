//! Google Cloud Translation v2 provider
//!
//! # Authentication
//!
//! The API key is passed explicitly or loaded from the
//! `GOOGLE_TRANSLATE_API_KEY` environment variable. Obtain a key from:
//! https://console.cloud.google.com/
//!
//! No source language is sent, so Google detects it.

use crate::config::{API_KEY_ENV_VAR, load_credential_from_env};
use crate::error::{MarkupError, MarkupResult, mask_credential};
use crate::gateway::translator::{GatewayResult, ProviderError, TextFormat, TranslationGateway};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per request (30K per Google Translate API limits)
    const MAX_CHARS_PER_REQUEST: usize = 30_000;

    const DEFAULT_BASE_URL: &'static str =
        "https://translation.googleapis.com/language/translate/v2";

    /// Create a new provider with an explicit API key
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MarkupError::Configuration)` - If the key is empty or the HTTP client cannot be built
    pub fn new(api_key: String) -> MarkupResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MarkupError::Configuration(
                "The Google Cloud API key may not be an empty string.".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MarkupError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MarkupResult<Self> {
        Self::new(load_credential_from_env()?)
    }

    /// Point the provider at another endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Turn a non-success response body into a `ProviderError`
    ///
    /// Google reports failures as `{"error": {"code": 403, "message": "..."}}`.
    /// Falls back to the raw body when it is not in that shape.
    fn parse_error_body(status: u16, body: &str) -> ProviderError {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let error = parsed.as_ref().map(|json| &json["error"]);

        let code = error
            .and_then(|e| e["code"].as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(status);
        let message = error
            .and_then(|e| e["message"].as_str())
            .map(|s| s.to_string())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            });

        // Google answers an unknown key with 400 rather than 403
        let code = match &message {
            Some(msg) if code == 400 && msg.contains("API key not valid") => 403,
            _ => code,
        };

        ProviderError::new(Some(code), message)
    }

    /// Extract the first `translatedText` from a success body
    fn parse_success_body(json: &serde_json::Value) -> GatewayResult<String> {
        let translations = json["data"]["translations"].as_array().ok_or_else(|| {
            ProviderError::message("Invalid API response: missing 'data.translations' array")
        })?;

        translations
            .first()
            .and_then(|t| t["translatedText"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::message("Invalid API response: missing 'translatedText' field")
            })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &mask_credential(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TranslationGateway for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        format: TextFormat,
    ) -> GatewayResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        if text.chars().count() > Self::MAX_CHARS_PER_REQUEST {
            return Err(ProviderError::message(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_REQUEST
            )));
        }

        let body = json!({
            "q": [text],
            "target": target_language,
            "format": format.as_str(),
        });

        debug!(
            target_language,
            %format,
            chars = text.len(),
            "Sending Google Translate request"
        );

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error_body(status.as_u16(), &error_text));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            ProviderError::message(format!("Failed to parse API response: {}", e))
        })?;

        Self::parse_success_body(&json)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
