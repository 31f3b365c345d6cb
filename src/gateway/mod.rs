//! Translation Gateway
//!
//! The external translation provider behind a small async trait, so the
//! orchestrator never depends on a specific backend.
//!
//! # Example
//!
//! ```ignore
//! use markup_translator::gateway::{GoogleTranslateProvider, TextFormat, TranslationGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("<b>Hello</b>", "fr", TextFormat::Html).await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```
pub mod google_translate;
pub mod mock;
pub mod translator;

pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockGateway, MockMode, RecordedRequest};
pub use translator::{GatewayResult, ProviderError, TextFormat, TranslationGateway};
