//! Translate the text inside HTML-like markup without disturbing the parts
//! that must stay as they are.
//!
//! Delimited spans such as `{{templating}}` are swapped for placeholder
//! tokens before the document reaches the translation provider and restored
//! afterwards. Values of selected attributes (`placeholder`, `data-message`,
//! ...) get their own plain-text translation and are spliced back before the
//! whole document is translated as HTML.
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
//!         .with_attribute("placeholder");
//!     let translator = MarkupTranslator::new("your-api-key", options)?;
//!
//!     let html = r#"<input placeholder="Your name"> <p>Hi {{user}}</p>"#;
//!     println!("{}", translator.translate_from_text(html, "fr").await?);
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod config;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod languages;
pub mod markup_translator;
pub mod protect;


// Re-export main types for convenient access
pub use attributes::{AttributeMatch, find_attribute_matches, translate_attributes};
pub use config::{DelimiterPair, TranslatorOptions};
pub use entities::decode_entities;
pub use error::{MarkupError, MarkupResult};
pub use gateway::{GoogleTranslateProvider, MockGateway, MockMode, TextFormat, TranslationGateway};
pub use languages::list_supported_languages;
pub use markup_translator::MarkupTranslator;
pub use protect::{PlaceholderGroup, PlaceholderScheme, Protected, protect, restore};
