//! Translator configuration
//!
//! Options are fixed when a [`MarkupTranslator`](crate::MarkupTranslator) is
//! built and never change afterwards. They can be assembled in code or read
//! from JSON using the same field names as the JavaScript package this crate
//! grew out of:
//!
//! ```json
//! {
//!   "excludeDelimiters": [{ "start": "{{", "end": "}}" }],
//!   "includeAttributes": ["placeholder", "data-message"]
//! }
//! ```

use crate::error::{MarkupError, MarkupResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Google Cloud API key
pub const API_KEY_ENV_VAR: &str = "GOOGLE_TRANSLATE_API_KEY";

/// Characters that may not appear in a delimiter
pub const RESERVED_DELIMITER_CHARS: [char; 3] = ['\'', '"', '`'];

/// Literal start/end markers of a span that must survive translation untouched
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub start: String,
    pub end: String,
}

impl DelimiterPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Check that both markers are non-empty and free of quote characters
    pub fn validate(&self) -> MarkupResult<()> {
        if self.start.is_empty() || self.end.is_empty() {
            return Err(MarkupError::Configuration(format!(
                "Invalid delimiter ({}) provided in the excludeDelimiters field. \
                 Delimiter objects must have the form {{ start: string, end: string }}.",
                self
            )));
        }

        for reserved in RESERVED_DELIMITER_CHARS {
            if self.start.contains(reserved) || self.end.contains(reserved) {
                return Err(MarkupError::Configuration(format!(
                    "Invalid character ({}) is present in delimiter {}. \
                     Delimiters may not contain the following characters: ', \", or `.",
                    reserved, self
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for DelimiterPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ start: {:?}, end: {:?} }}", self.start, self.end)
    }
}

/// Delimiter rules, attribute rules and language policy for one translator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorOptions {
    /// Spans to protect, applied in this order
    #[serde(default)]
    pub exclude_delimiters: Vec<DelimiterPair>,
    /// Attributes whose values get their own plain-text translation
    #[serde(default)]
    pub include_attributes: Vec<String>,
    /// Reject target languages missing from the built-in catalog
    #[serde(default = "default_restrict_languages")]
    pub restrict_languages: bool,
}

fn default_restrict_languages() -> bool {
    true
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            exclude_delimiters: Vec::new(),
            include_attributes: Vec::new(),
            restrict_languages: true,
        }
    }
}

impl TranslatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, start: &str, end: &str) -> Self {
        self.exclude_delimiters.push(DelimiterPair::new(start, end));
        self
    }

    pub fn with_attribute(mut self, name: &str) -> Self {
        self.include_attributes.push(name.to_string());
        self
    }

    pub fn restrict_languages(mut self, restrict: bool) -> Self {
        self.restrict_languages = restrict;
        self
    }

    /// Parse options from a JSON document
    ///
    /// Malformed delimiters (missing `start`/`end`, non-string values) and
    /// non-string attribute names surface as configuration errors.
    pub fn from_json_str(json: &str) -> MarkupResult<Self> {
        let options: TranslatorOptions = serde_json::from_str(json)
            .map_err(|e| MarkupError::Configuration(format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse a JSON options file
    pub fn from_json_file(path: &Path) -> MarkupResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MarkupError::Configuration(format!(
                "Failed to read options file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Validate every delimiter and attribute rule
    pub fn validate(&self) -> MarkupResult<()> {
        for delimiter in &self.exclude_delimiters {
            delimiter.validate()?;
        }

        for attribute in &self.include_attributes {
            validate_attribute_name(attribute)?;
        }

        Ok(())
    }

    /// Every literal the placeholder tokens must avoid
    pub(crate) fn reserved_literals(&self) -> Vec<String> {
        self.exclude_delimiters
            .iter()
            .flat_map(|d| [d.start.clone(), d.end.clone()])
            .chain(self.include_attributes.iter().cloned())
            .collect()
    }
}

/// Attribute names are matched literally, so anything that would break the
/// `name = "value"` shape is rejected up front.
fn validate_attribute_name(name: &str) -> MarkupResult<()> {
    let malformed = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || RESERVED_DELIMITER_CHARS.contains(&c));

    if malformed {
        return Err(MarkupError::Configuration(format!(
            "Invalid attribute ({:?}) provided in the includeAttributes field. \
             Attributes must be non-empty strings without whitespace, '=' or quotes.",
            name
        )));
    }

    Ok(())
}

/// Check that a credential was actually provided
pub fn validate_credential(credential: &str) -> MarkupResult<()> {
    if credential.trim().is_empty() {
        return Err(MarkupError::Configuration(
            "The Google Cloud API key may not be an empty string.".to_string(),
        ));
    }
    Ok(())
}

/// Read the credential from `GOOGLE_TRANSLATE_API_KEY`
pub fn load_credential_from_env() -> MarkupResult<String> {
    let credential = std::env::var(API_KEY_ENV_VAR).map_err(|_| {
        MarkupError::Configuration(format!(
            "Please provide a Google Cloud API key ({} environment variable not set).",
            API_KEY_ENV_VAR
        ))
    })?;
    validate_credential(&credential)?;
    Ok(credential)
}
