//! Entity Decoder
//!
//! Providers return HTML-escaped output (`&#39;`, `&quot;`, `&amp;`, ...).
//! Decoding happens after every provider call so the rest of the pipeline
//! works on literal text.

/// Decode named and numeric HTML5 character references
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
