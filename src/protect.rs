//! Protection Codec
//!
//! Shields delimiter-bounded spans (templating expressions and the like) from
//! the translation provider. `protect` swaps every span for an opaque
//! placeholder token; `restore` puts the original spans back.
//!
//! # Example
//!
//! ```ignore
//! let delimiters = vec![DelimiterPair::new("{{", "}}")];
//! let scheme = PlaceholderScheme::select(&[])?;
//! let protected = protect("Hi {{name}}, bye {{name}}", &delimiters, &scheme)?;
//! // protected.text == "Hi MARKUPTRANSLATORPLACEHOLDER0Z, bye MARKUPTRANSLATORPLACEHOLDER0Z"
//! assert_eq!(restore(&protected.text, &protected.groups), "Hi {{name}}, bye {{name}}");
//! ```
//!
//! Rules apply one after another, each scanning the output of the previous
//! one, so the first configured rule wins where two rules overlap.

use std::ops::Range;

use tracing::{debug, warn};

use crate::config::DelimiterPair;
use crate::error::{MarkupError, MarkupResult};

/// Candidate (prefix, suffix) pairs for placeholder tokens, in preference order.
/// No prefix contains its own suffix or a digit.
const PLACEHOLDER_SCHEMES: [(&str, &str); 3] = [
    ("MARKUPTRANSLATORPLACEHOLDER", "Z"),
    ("mkptrph", "q"),
    ("QXV", "W"),
];

/// Upper bound on rejected candidates before giving up on a call
const MAX_TOKEN_ATTEMPTS: usize = 10_000;

/// Shape of the placeholder tokens for one translator: `<prefix><n><suffix>`
///
/// The suffix terminates the number, so `…1Z` never matches inside `…10Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderScheme {
    prefix: &'static str,
    suffix: &'static str,
    /// Literals no token may contain (delimiter markers, attribute names)
    reserved: Vec<String>,
}

impl PlaceholderScheme {
    /// Pick the first scheme whose fixed parts avoid every reserved literal
    ///
    /// # Returns
    ///
    /// * `Ok(PlaceholderScheme)` - A scheme that can generate tokens
    /// * `Err(MarkupError::Configuration)` - If every scheme clashes with the configuration
    pub fn select(reserved: &[String]) -> MarkupResult<Self> {
        PLACEHOLDER_SCHEMES
            .iter()
            .find(|(prefix, suffix)| {
                !reserved
                    .iter()
                    .any(|r| prefix.contains(r.as_str()) || suffix.contains(r.as_str()))
            })
            .map(|&(prefix, suffix)| Self {
                prefix,
                suffix,
                reserved: reserved.to_vec(),
            })
            .ok_or_else(|| {
                MarkupError::Configuration(
                    "The configured delimiters and attributes leave no usable placeholder token."
                        .to_string(),
                )
            })
    }

    /// Token for counter value `n`
    pub fn token(&self, n: usize) -> String {
        format!("{}{}{}", self.prefix, n, self.suffix)
    }

    /// Start a generator for one `protect` call over `original`
    pub fn generator<'a>(&'a self, original: &'a str) -> PlaceholderGenerator<'a> {
        PlaceholderGenerator {
            scheme: self,
            original,
            next: 0,
        }
    }
}

/// Per-call token source
///
/// Lives only as long as one translation, so concurrent calls never share a
/// counter.
#[derive(Debug)]
pub struct PlaceholderGenerator<'a> {
    scheme: &'a PlaceholderScheme,
    original: &'a str,
    next: usize,
}

impl PlaceholderGenerator<'_> {
    /// Next token that appears neither in the original input nor in `current`
    /// and contains no reserved literal
    pub fn next_token(&mut self, current: &str) -> MarkupResult<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let candidate = self.scheme.token(self.next);
            self.next += 1;

            let collides = self.original.contains(&candidate)
                || current.contains(&candidate)
                || self
                    .scheme
                    .reserved
                    .iter()
                    .any(|r| candidate.contains(r.as_str()));

            if !collides {
                return Ok(candidate);
            }
        }

        Err(MarkupError::Configuration(format!(
            "No collision-free placeholder token found after {} attempts.",
            MAX_TOKEN_ATTEMPTS
        )))
    }
}

/// One delimiter rule's worth of protected spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderGroup {
    /// Token that replaced every span of this rule
    pub placeholder: String,
    /// The rule that produced the spans
    pub delimiter: DelimiterPair,
    /// Original spans, delimiters included, in order of appearance
    pub spans: Vec<String>,
}

/// Output of [`protect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    /// Groups in configuration order; rules without matches are absent
    pub groups: Vec<PlaceholderGroup>,
}

/// Byte ranges of every `start … end` span, left to right
///
/// Matching is non-greedy and does not nest: each span ends at the first
/// `end` after its `start`. A `start` with no later `end` stops the scan.
pub fn find_delimited_spans(text: &str, delimiter: &DelimiterPair) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(&delimiter.start) {
        let start = cursor + offset;
        let body = start + delimiter.start.len();

        let Some(end_offset) = text[body..].find(&delimiter.end) else {
            break;
        };

        let end = body + end_offset + delimiter.end.len();
        spans.push(start..end);
        cursor = end;
    }

    spans
}

/// Replace every delimited span with a placeholder token
///
/// All spans of one rule share a token; the group keeps their original
/// text in order so `restore` can hand them back one by one.
pub fn protect(
    text: &str,
    delimiters: &[DelimiterPair],
    scheme: &PlaceholderScheme,
) -> MarkupResult<Protected> {
    let mut generator = scheme.generator(text);
    let mut protected = text.to_string();
    let mut groups = Vec::new();

    for delimiter in delimiters {
        let ranges = find_delimited_spans(&protected, delimiter);
        if ranges.is_empty() {
            continue;
        }

        let placeholder = generator.next_token(&protected)?;
        let mut substituted = String::with_capacity(protected.len());
        let mut spans = Vec::with_capacity(ranges.len());
        let mut cursor = 0;

        for range in ranges {
            substituted.push_str(&protected[cursor..range.start]);
            substituted.push_str(&placeholder);
            spans.push(protected[range.clone()].to_string());
            cursor = range.end;
        }
        substituted.push_str(&protected[cursor..]);

        debug!(
            %delimiter,
            spans = spans.len(),
            placeholder = %placeholder,
            "Protected delimited spans"
        );

        protected = substituted;
        groups.push(PlaceholderGroup {
            placeholder,
            delimiter: delimiter.clone(),
            spans,
        });
    }

    Ok(Protected {
        text: protected,
        groups,
    })
}

/// Put the original spans back in place of their placeholders
///
/// Groups unwind in reverse configuration order: a later rule may have
/// captured text that already held an earlier rule's token.
///
/// Within a group the n-th token occurrence receives the n-th stored span.
/// Occurrences beyond the stored spans stay as literal tokens; spans with no
/// remaining occurrence are dropped. Both cases are logged.
pub fn restore(text: &str, groups: &[PlaceholderGroup]) -> String {
    groups
        .iter()
        .rev()
        .fold(text.to_string(), |acc, group| restore_group(&acc, group))
}

fn restore_group(text: &str, group: &PlaceholderGroup) -> String {
    let mut restored = String::with_capacity(text.len());
    let mut spans = group.spans.iter();
    let mut rest = text;
    let mut unresolved = 0;

    while let Some(pos) = rest.find(&group.placeholder) {
        restored.push_str(&rest[..pos]);
        match spans.next() {
            Some(span) => restored.push_str(span),
            None => {
                restored.push_str(&group.placeholder);
                unresolved += 1;
            }
        }
        rest = &rest[pos + group.placeholder.len()..];
    }
    restored.push_str(rest);

    if unresolved > 0 {
        warn!(
            placeholder = %group.placeholder,
            unresolved,
            "Placeholder occurs more often than protected spans; leaving extras unresolved"
        );
    }

    let dropped = spans.count();
    if dropped > 0 {
        warn!(
            placeholder = %group.placeholder,
            dropped,
            "Protected spans missing from translated text"
        );
    }

    restored
}
