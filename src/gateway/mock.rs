//! Mock Translation Gateway for testing
//!
//! A deterministic, API-free provider for exercising the translation pipeline
//! without API keys or network access. Every request is recorded so tests can
//! assert how many calls were made and with which arguments.
//!
//! # Example
//!
//! ```ignore
//! use markup_translator::gateway::{MockGateway, MockMode, TextFormat, TranslationGateway};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockGateway::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "fr", TextFormat::Text).await.unwrap();
//!     assert_eq!(result, "hello_fr");
//!     assert_eq!(mock.call_count(), 1);
//! }
//! ```

use crate::gateway::translator::{GatewayResult, ProviderError, TextFormat, TranslationGateway};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target language: "hello" → "hello_fr"
    Suffix,

    /// Whole-text lookup, falling back to `Suffix`:
    /// (text, target_language) → translation
    Mappings(HashMap<(String, String), String>),

    /// Replace every occurrence of each source phrase, in order.
    /// Text outside the phrases, markup and placeholder tokens included, is untouched.
    Dictionary(Vec<(String, String)>),

    /// Uppercase everything, tags included
    Uppercase,

    /// Simulate a provider failure
    Error {
        status: Option<u16>,
        message: Option<String>,
    },

    /// Return input unchanged
    NoOp,
}

/// One request received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub text: String,
    pub target_language: String,
    pub format: TextFormat,
}

/// Mock gateway that simulates various translation scenarios
#[derive(Debug, Clone)]
pub struct MockGateway {
    mode: MockMode,
    /// Encode `'` as `&#39;` in responses, the way Google does
    encode_apostrophes: bool,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGateway {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            encode_apostrophes: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return entity-encoded apostrophes so decoding can be observed
    pub fn with_apostrophe_entities(mut self) -> Self {
        self.encode_apostrophes = true;
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Snapshot of all requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn record(&self, text: &str, target_language: &str, format: TextFormat) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                text: text.to_string(),
                target_language: target_language.to_string(),
                format,
            });
        }
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> GatewayResult<String> {
        let translated = match &self.mode {
            MockMode::Suffix => format!("{}_{}", text, target),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                map.get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target))
            }
            MockMode::Dictionary(entries) => entries
                .iter()
                .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to)),
            MockMode::Uppercase => text.to_uppercase(),
            MockMode::Error { status, message } => {
                return Err(ProviderError::new(*status, message.clone()));
            }
            MockMode::NoOp => text.to_string(),
        };

        if self.encode_apostrophes {
            Ok(translated.replace('\'', "&#39;"))
        } else {
            Ok(translated)
        }
    }
}

#[async_trait]
impl TranslationGateway for MockGateway {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        format: TextFormat,
    ) -> GatewayResult<String> {
        self.record(text, target_language, format);
        self.apply_translation(text, target_language)
    }

    fn provider_name(&self) -> &str {
        "Mock Gateway"
    }
}
