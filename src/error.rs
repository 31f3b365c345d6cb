//! Error types for markup translation
//!
//! Every public operation returns [`MarkupResult`]. Failures are classified so
//! callers can tell a bad configuration from bad input, a rejected credential,
//! or a provider outage.

use thiserror::Error;

use crate::gateway::ProviderError;

/// Error returned by the translator and its building blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Invalid constructor-time configuration (credential, delimiters, attributes)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid call arguments, detected before any provider request
    #[error("Validation error: {0}")]
    Validation(String),

    /// The translation provider rejected the credential
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Any other provider failure carrying a message
    #[error("Translation provider error: {0}")]
    Gateway(String),

    /// Provider failure without any message
    #[error("An unexpected error has occurred")]
    Unknown,

    /// Reading or writing a file failed after validation passed
    #[error("I/O error: {0}")]
    Io(String),
}

impl MarkupError {
    /// Whether retrying the same call can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, MarkupError::Gateway(_))
    }

    /// Classify a provider failure
    ///
    /// HTTP 401 and 403 mean the credential was refused. `credential` is only
    /// used in masked form inside the message.
    pub fn from_provider(error: ProviderError, credential: &str) -> Self {
        match (error.status, error.message) {
            (Some(401) | Some(403), _) => MarkupError::Authorization(format!(
                "The provided Google Cloud API key ({}) is invalid.",
                mask_credential(credential)
            )),
            (_, Some(message)) if !message.trim().is_empty() => MarkupError::Gateway(message),
            _ => MarkupError::Unknown,
        }
    }
}

/// Result type for markup translation
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Mask a credential so it can appear in messages and `Debug` output
///
/// Keeps the first four characters when the credential is long enough to
/// still hide most of it.
pub fn mask_credential(credential: &str) -> String {
    let visible: String = credential.chars().take(4).collect();
    if credential.chars().count() > 8 {
        format!("{}***", visible)
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_status_is_authorization() {
        let error = ProviderError::new(Some(403), Some("API key not valid".to_string()));
        let classified = MarkupError::from_provider(error, "AIzaSyExampleKey");
        match classified {
            MarkupError::Authorization(msg) => {
                assert!(msg.contains("AIza***"));
                assert!(!msg.contains("AIzaSyExampleKey"));
            }
            other => panic!("Expected Authorization, got {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized_status_is_authorization() {
        let error = ProviderError::new(Some(401), None);
        assert!(matches!(
            MarkupError::from_provider(error, "key"),
            MarkupError::Authorization(_)
        ));
    }

    #[test]
    fn test_message_is_gateway_error() {
        let error = ProviderError::new(Some(500), Some("Backend unavailable".to_string()));
        assert_eq!(
            MarkupError::from_provider(error, "key"),
            MarkupError::Gateway("Backend unavailable".to_string())
        );
    }

    #[test]
    fn test_missing_message_is_unknown() {
        assert_eq!(
            MarkupError::from_provider(ProviderError::new(None, None), "key"),
            MarkupError::Unknown
        );
        assert_eq!(
            MarkupError::from_provider(ProviderError::new(Some(500), Some("  ".into())), "key"),
            MarkupError::Unknown
        );
    }

    #[test]
    fn test_only_gateway_errors_are_retryable() {
        assert!(MarkupError::Gateway("timeout".into()).is_retryable());
        assert!(!MarkupError::Authorization("bad key".into()).is_retryable());
        assert!(!MarkupError::Validation("no text".into()).is_retryable());
        assert!(!MarkupError::Configuration("bad delimiter".into()).is_retryable());
        assert!(!MarkupError::Unknown.is_retryable());
    }

    #[test]
    fn test_mask_short_credential() {
        assert_eq!(mask_credential("abc"), "***");
        assert_eq!(mask_credential("AIzaSyCh5Dce"), "AIza***");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MarkupError::Validation("Please provide a target language.".into()).to_string(),
            "Validation error: Please provide a target language."
        );
        assert_eq!(
            MarkupError::Unknown.to_string(),
            "An unexpected error has occurred"
        );
    }
}
