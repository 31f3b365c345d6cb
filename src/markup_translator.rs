//! Markup translation pipeline
//!
//! `MarkupTranslator` ties the pieces together for one call:
//!
//! 1. validate the target language
//! 2. protect delimited spans behind placeholder tokens
//! 3. translate configured attribute values as plain text and splice them back
//! 4. translate the whole document as HTML
//! 5. decode HTML entities in the result
//! 6. restore the protected spans
//!
//! # Example
//!
//! ```ignore
//! use markup_translator::{MarkupTranslator, TranslatorOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = TranslatorOptions::new()
//!         .with_delimiter("{{", "}}")
//!         .with_attribute("data-message");
//!     let translator = MarkupTranslator::from_env(options)?;
//!
//!     let html = "<div data-message='Hello, {{name}}'></div>";
//!     println!("{}", translator.translate_from_text(html, "es").await?);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::attributes::translate_attributes;
use crate::config::{TranslatorOptions, load_credential_from_env, validate_credential};
use crate::entities::decode_entities;
use crate::error::{MarkupError, MarkupResult, mask_credential};
use crate::gateway::{GoogleTranslateProvider, TextFormat, TranslationGateway};
use crate::languages::{is_supported, list_supported_languages, validate_language_code};
use crate::protect::{PlaceholderScheme, protect, restore};

/// Translator for HTML-like documents
///
/// Configuration is validated once at construction and is immutable
/// afterwards. Calls share nothing mutable, so one instance can serve
/// concurrent translations.
pub struct MarkupTranslator {
    credential: String,
    options: TranslatorOptions,
    scheme: PlaceholderScheme,
    gateway: Arc<dyn TranslationGateway>,
}

impl MarkupTranslator {
    /// Create a translator backed by Google Cloud Translation
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - Ready-to-use translator
    /// * `Err(MarkupError::Configuration)` - Empty credential, malformed delimiter or attribute
    pub fn new(credential: impl Into<String>, options: TranslatorOptions) -> MarkupResult<Self> {
        let credential = credential.into();
        validate_credential(&credential)?;
        let provider = GoogleTranslateProvider::new(credential.clone())?;
        Self::with_gateway(credential, options, Arc::new(provider))
    }

    /// Create a translator with the key from `GOOGLE_TRANSLATE_API_KEY`
    pub fn from_env(options: TranslatorOptions) -> MarkupResult<Self> {
        Self::new(load_credential_from_env()?, options)
    }

    /// Create a translator on top of any gateway
    ///
    /// `credential` is still required: it identifies the caller in
    /// authorization errors.
    pub fn with_gateway(
        credential: impl Into<String>,
        options: TranslatorOptions,
        gateway: Arc<dyn TranslationGateway>,
    ) -> MarkupResult<Self> {
        let credential = credential.into();
        validate_credential(&credential)?;
        options.validate()?;
        let scheme = PlaceholderScheme::select(&options.reserved_literals())?;

        Ok(Self {
            credential,
            options,
            scheme,
            gateway,
        })
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Language name → code for every supported target language
    pub fn list_supported_languages(&self) -> BTreeMap<&'static str, &'static str> {
        list_supported_languages()
    }

    fn validate_target_language(&self, target_language: &str) -> MarkupResult<()> {
        validate_language_code(target_language)?;

        if self.options.restrict_languages && !is_supported(target_language) {
            return Err(MarkupError::Validation(format!(
                "The target language ({}) is not supported.",
                target_language
            )));
        }

        Ok(())
    }

    /// Translate a markup string into `target_language`
    ///
    /// Spans matching the configured delimiters come back byte-for-byte;
    /// configured attribute values are translated on their own as plain text.
    pub async fn translate_from_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> MarkupResult<String> {
        self.validate_target_language(target_language)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        self.translate(text, target_language).await
    }

    /// Translate `input` and write the result to `output`
    ///
    /// The output file is only written once translation fully succeeded, and
    /// then atomically, so a failure never leaves a partial file behind.
    pub async fn translate_from_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target_language: &str,
    ) -> MarkupResult<bool> {
        let input = input.as_ref();
        let output = output.as_ref();

        if input.as_os_str().is_empty() {
            return Err(MarkupError::Validation(
                "Please provide an input file path.".to_string(),
            ));
        }
        if output.as_os_str().is_empty() {
            return Err(MarkupError::Validation(
                "Please provide an output file path.".to_string(),
            ));
        }
        self.validate_target_language(target_language)?;

        let exists = tokio::fs::try_exists(input).await.map_err(|e| {
            MarkupError::Io(format!("Failed to access {}: {}", input.display(), e))
        })?;
        if !exists {
            return Err(MarkupError::Validation(format!(
                "The input file ({}) does not exist.",
                input.display()
            )));
        }

        let text = tokio::fs::read_to_string(input).await.map_err(|e| {
            MarkupError::Io(format!("Failed to read {}: {}", input.display(), e))
        })?;

        let translated = self.translate_from_text(&text, target_language).await?;

        let output_path = output.to_path_buf();
        tokio::task::spawn_blocking(move || write_atomically(&output_path, &translated))
            .await
            .map_err(|e| MarkupError::Io(format!("Output writer failed: {}", e)))??;

        info!(
            input = %input.display(),
            output = %output.display(),
            "Wrote translated file"
        );
        Ok(true)
    }

    async fn translate(&self, text: &str, target_language: &str) -> MarkupResult<String> {
        info!(
            target_language,
            provider = self.gateway.provider_name(),
            bytes = text.len(),
            "Translating markup"
        );

        let protected = protect(text, &self.options.exclude_delimiters, &self.scheme)?;
        debug!(groups = protected.groups.len(), "Protected spans");

        let with_attributes = translate_attributes(
            &protected.text,
            &self.options.include_attributes,
            self.gateway.as_ref(),
            target_language,
        )
        .await
        .map_err(|e| MarkupError::from_provider(e, &self.credential))?;

        let encoded = self
            .gateway
            .translate(&with_attributes, target_language, TextFormat::Html)
            .await
            .map_err(|e| MarkupError::from_provider(e, &self.credential))?;
        debug!(bytes = encoded.len(), "Document translated");

        let decoded = decode_entities(&encoded);
        Ok(restore(&decoded, &protected.groups))
    }
}

impl std::fmt::Debug for MarkupTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupTranslator")
            .field("credential", &mask_credential(&self.credential))
            .field("options", &self.options)
            .field("provider", &self.gateway.provider_name())
            .finish()
    }
}

/// Write through a temporary file in the destination directory, then
/// rename it over `path`
///
/// An existing file keeps its permissions; a new one gets the mode a plain
/// create would give it.
fn write_atomically(path: &Path, contents: &str) -> MarkupResult<()> {
    let io_error =
        |e: std::io::Error| MarkupError::Io(format!("Failed to write {}: {}", path.display(), e));

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // umask still applies, as for File::create
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut file = builder.tempfile_in(directory).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(io_error)?;
    }
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
