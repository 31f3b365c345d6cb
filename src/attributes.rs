//! Attribute Extractor/Reinjector
//!
//! Finds `name = "value"` / `name = 'value'` assignments for the configured
//! attribute names, translates each distinct value on its own as plain text,
//! and splices the results back into the markup. This runs before the
//! whole-document call so short attribute strings get a dedicated
//! translation instead of whatever the document context would make of them.
//!
//! Markup is not parsed. Matching is textual:
//!
//! 1. the attribute name, literally and case-sensitively
//! 2. optional whitespace, `=`, optional whitespace
//! 3. a `'` or `"` quote
//! 4. the value, running to the LAST matching quote on the same line
//!
//! Step 4 is deliberately greedy: `title="a" alt="b"` on one line captures
//! `a" alt="b` as the value of `title`.

use futures::future::try_join_all;
use tracing::debug;

use crate::entities::decode_entities;
use crate::gateway::{GatewayResult, ProviderError, TextFormat, TranslationGateway};

/// One attribute assignment found in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    /// Byte offset of the attribute name
    pub start: usize,
    /// Byte offset just past the closing quote
    pub end: usize,
    pub name: String,
    pub quote: char,
    /// Text between the quotes
    pub value: String,
    /// The whole occurrence, `name` through the closing quote
    pub full_capture: String,
}

impl AttributeMatch {
    /// The occurrence with its value swapped for `value`
    ///
    /// Built from the parts rather than by searching the old value inside
    /// the capture, which could hit the attribute name instead.
    pub fn with_value(&self, value: &str) -> String {
        let prefix_len = self.full_capture.len() - self.value.len() - self.quote.len_utf8();
        format!(
            "{}{}{}",
            &self.full_capture[..prefix_len],
            value,
            self.quote
        )
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(offset, _)| pos + offset)
        .unwrap_or(text.len())
}

/// Try to read a full assignment whose name starts at `start`
fn match_assignment(text: &str, start: usize, name: &str) -> Option<AttributeMatch> {
    let mut pos = skip_whitespace(text, start + name.len());

    if !text[pos..].starts_with('=') {
        return None;
    }
    pos = skip_whitespace(text, pos + 1);

    let quote = text[pos..].chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value_start = pos + quote.len_utf8();

    let line_end = text[value_start..]
        .find(is_line_terminator)
        .map(|offset| value_start + offset)
        .unwrap_or(text.len());
    let value_end = value_start + text[value_start..line_end].rfind(quote)?;
    let end = value_end + quote.len_utf8();

    Some(AttributeMatch {
        start,
        end,
        name: name.to_string(),
        quote,
        value: text[value_start..value_end].to_string(),
        full_capture: text[start..end].to_string(),
    })
}

/// Every assignment of attribute `name` in `text`, left to right
pub fn find_attribute_matches(text: &str, name: &str) -> Vec<AttributeMatch> {
    let mut matches = Vec::new();
    let Some(first_char) = name.chars().next() else {
        return matches;
    };

    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(name) {
        let start = cursor + offset;
        match match_assignment(text, start, name) {
            Some(found) => {
                cursor = found.end;
                matches.push(found);
            }
            None => cursor = start + first_char.len_utf8(),
        }
    }

    matches
}

/// Matches for all names, in configuration order, without repeated captures
///
/// Two occurrences with byte-identical captures are one match; the first one
/// found wins.
pub fn collect_unique_matches(text: &str, names: &[String]) -> Vec<AttributeMatch> {
    let mut unique: Vec<AttributeMatch> = Vec::new();

    for name in names {
        for found in find_attribute_matches(text, name) {
            if !unique.iter().any(|m| m.full_capture == found.full_capture) {
                unique.push(found);
            }
        }
    }

    unique
}

/// Translate the values of the configured attributes and splice them back
///
/// Each distinct capture costs one plain-text gateway call; calls run
/// concurrently and the first failure aborts the whole pass. Every literal
/// occurrence of a capture is then replaced by its translated form. Empty
/// values are left alone.
pub async fn translate_attributes(
    text: &str,
    names: &[String],
    gateway: &dyn TranslationGateway,
    target_language: &str,
) -> GatewayResult<String> {
    if names.is_empty() {
        return Ok(text.to_string());
    }

    let unique = collect_unique_matches(text, names);
    debug!(matches = unique.len(), "Collected attribute values");

    let pending = unique
        .iter()
        .filter(|m| !m.value.is_empty())
        .map(|m| async move {
            let translated = gateway
                .translate(&m.value, target_language, TextFormat::Text)
                .await?;
            Ok::<_, ProviderError>((m, decode_entities(&translated)))
        });
    let translations = try_join_all(pending).await?;

    let mut result = text.to_string();
    for (found, translated) in translations {
        debug!(
            attribute = %found.name,
            from = %found.value,
            to = %translated,
            "Translated attribute value"
        );
        result = result.replace(&found.full_capture, &found.with_value(&translated));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockGateway, MockMode};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ========== Matching ==========

    #[test]
    fn test_double_and_single_quotes() {
        let text = r#"<input placeholder="Your name"><input placeholder='Your email'>"#;
        let found = find_attribute_matches(text, "placeholder");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "Your name");
        assert_eq!(found[0].quote, '"');
        assert_eq!(found[1].value, "Your email");
        assert_eq!(found[1].quote, '\'');
    }

    #[test]
    fn test_whitespace_around_equals() {
        let text = "<div data-message =\t 'Hello'></div>";
        let found = find_attribute_matches(text, "data-message");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "Hello");
        assert_eq!(found[0].full_capture, "data-message =\t 'Hello'");
        assert_eq!(&text[found[0].start..found[0].end], found[0].full_capture);
    }

    #[test]
    fn test_greedy_capture_to_last_quote_on_line() {
        let text = r#"<img title="a" alt="b">"#;
        let found = find_attribute_matches(text, "title");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, r#"a" alt="b"#);
    }

    #[test]
    fn test_capture_stops_at_line_end() {
        let text = "<img title=\"first\">\n<img title=\"second\">";
        let found = find_attribute_matches(text, "title");
        let values: Vec<&str> = found.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["first", "second"]);
    }

    #[test]
    fn test_unterminated_value_is_skipped() {
        let text = "<img title=\"open\n\">";
        assert!(find_attribute_matches(text, "title").is_empty());
    }

    #[test]
    fn test_name_without_assignment_is_skipped() {
        let text = "title is not an attribute, but title='this' is";
        let found = find_attribute_matches(text, "title");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "this");
    }

    #[test]
    fn test_unquoted_value_is_skipped() {
        assert!(find_attribute_matches("<input placeholder=name>", "placeholder").is_empty());
    }

    #[test]
    fn test_empty_value() {
        let found = find_attribute_matches("<input placeholder=\"\">", "placeholder");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "");
    }

    #[test]
    fn test_multibyte_value() {
        let found = find_attribute_matches("<p title='Grüße, 世界'>", "title");
        assert_eq!(found[0].value, "Grüße, 世界");
    }

    // ========== Rebuilding ==========

    #[test]
    fn test_with_value_keeps_name_and_quotes() {
        // value equal to part of the name must not corrupt the name
        let found = &find_attribute_matches("<i data-a='a'>", "data-a")[0];
        assert_eq!(found.with_value("b"), "data-a='b'");

        let found = &find_attribute_matches("<i title = \"x\">", "title")[0];
        assert_eq!(found.with_value("yé"), "title = \"yé\"");
    }

    // ========== Deduplication ==========

    #[test]
    fn test_identical_captures_deduplicated() {
        let text = "<a data-x=\"A\"></a>\n<b data-x=\"A\"></b>\n<c data-x='A'></c>";
        let unique = collect_unique_matches(text, &names(&["data-x"]));
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].full_capture, "data-x=\"A\"");
        assert_eq!(unique[1].full_capture, "data-x='A'");
    }

    #[test]
    fn test_configuration_order_across_names() {
        let text = "<i title='t' placeholder='p'>";
        let unique = collect_unique_matches(text, &names(&["placeholder", "title"]));
        assert_eq!(unique[0].name, "placeholder");
        assert_eq!(unique[1].name, "title");
    }

    // ========== Translation Pass ==========

    #[tokio::test]
    async fn test_duplicate_value_translated_once() {
        let mock = MockGateway::new(MockMode::Suffix);
        let text = "<a data-x=\"A\"></a>\n<b data-x=\"A\"></b>";
        let result = translate_attributes(text, &names(&["data-x"]), &mock, "es")
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.requests()[0].text, "A");
        assert_eq!(mock.requests()[0].format, TextFormat::Text);
        assert_eq!(result, "<a data-x=\"A_es\"></a>\n<b data-x=\"A_es\"></b>");
    }

    #[tokio::test]
    async fn test_no_names_no_calls() {
        let mock = MockGateway::new(MockMode::Suffix);
        let text = "<input placeholder='x'>";
        let result = translate_attributes(text, &[], &mock, "es").await.unwrap();
        assert_eq!(result, text);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_values_not_sent() {
        let mock = MockGateway::new(MockMode::Suffix);
        let text = "<input placeholder=''>";
        let result = translate_attributes(text, &names(&["placeholder"]), &mock, "es")
            .await
            .unwrap();
        assert_eq!(result, text);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translated_values_are_entity_decoded() {
        let mock = MockGateway::new(MockMode::Dictionary(vec![(
            "Your name".to_string(),
            "Votre nom d'utilisateur".to_string(),
        )]))
        .with_apostrophe_entities();
        let text = r#"<input placeholder="Your name">"#;
        let result = translate_attributes(text, &names(&["placeholder"]), &mock, "fr")
            .await
            .unwrap();
        assert_eq!(result, r#"<input placeholder="Votre nom d'utilisateur">"#);
    }

    #[tokio::test]
    async fn test_other_text_untouched() {
        let mock = MockGateway::new(MockMode::Uppercase);
        let text = "<p title='hi'>hi there</p>";
        let result = translate_attributes(text, &names(&["title"]), &mock, "de")
            .await
            .unwrap();
        assert_eq!(result, "<p title='HI'>hi there</p>");
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let mock = MockGateway::new(MockMode::Error {
            status: Some(500),
            message: Some("boom".to_string()),
        });
        let err = translate_attributes("<i title='x'>", &names(&["title"]), &mock, "de")
            .await
            .unwrap_err();
        assert_eq!(err.message.as_deref(), Some("boom"));
    }
}
