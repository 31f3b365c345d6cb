//! Translation Gateway trait
//!
//! Defines `TranslationGateway` for provider abstraction, enabling different
//! backends (Google Translate, mock, etc.) without coupling the orchestrator
//! to any of them.

use async_trait::async_trait;
use std::fmt;

/// How the provider should treat the submitted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    /// Markup-aware translation: tags are kept, text nodes are translated
    Html,
    /// Plain text, used for attribute values
    Text,
}

impl TextFormat {
    /// Wire name understood by providers ("html" or "text")
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Html => "html",
            TextFormat::Text => "text",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a provider
///
/// Kept unclassified on purpose: the caller holds the credential and decides
/// whether a status means authorization failure (see
/// [`MarkupError::from_provider`](crate::error::MarkupError::from_provider)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// HTTP status or provider error code, when one was reported
    pub status: Option<u16>,
    /// Human-readable message, when one was reported
    pub message: Option<String>,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Failure with a message and no status
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.message) {
            (Some(status), Some(msg)) => write!(f, "[{}] {}", status, msg),
            (Some(status), None) => write!(f, "[{}]", status),
            (None, Some(msg)) => write!(f, "{}", msg),
            (None, None) => write!(f, "unknown provider error"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL carries the API key
        let error = error.without_url();
        ProviderError {
            status: error.status().map(|s| s.as_u16()),
            message: Some(error.to_string()),
        }
    }
}

/// Result type for gateway calls
pub type GatewayResult<T> = Result<T, ProviderError>;

/// Generic trait for translation providers
///
/// Implementations handle the actual translation work, whether through an
/// API (Google Translate) or deterministic logic (Mock).
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `target_language` - Target language code (e.g., "es", "zh-CN")
    /// * `format` - Whether `text` is markup or plain text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text, possibly entity-encoded
    /// * `Err(ProviderError)` - If the provider refused or failed
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        format: TextFormat,
    ) -> GatewayResult<String>;

    /// Name of this provider, used for logging
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wire_names() {
        assert_eq!(TextFormat::Html.as_str(), "html");
        assert_eq!(TextFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::new(Some(403), Some("Forbidden".into())).to_string(),
            "[403] Forbidden"
        );
        assert_eq!(ProviderError::message("timed out").to_string(), "timed out");
        assert_eq!(
            ProviderError::new(None, None).to_string(),
            "unknown provider error"
        );
    }
}
