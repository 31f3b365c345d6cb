//! Supported target languages
//!
//! A static catalog of the languages Google Cloud Translation v2 accepts as
//! targets, keyed by English name. Used to reject unsupported target
//! languages before any request is made.

use std::collections::BTreeMap;

use crate::error::{MarkupError, MarkupResult};

/// (name, code) pairs
const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("Afrikaans", "af"),
    ("Albanian", "sq"),
    ("Amharic", "am"),
    ("Arabic", "ar"),
    ("Armenian", "hy"),
    ("Azerbaijani", "az"),
    ("Basque", "eu"),
    ("Belarusian", "be"),
    ("Bengali", "bn"),
    ("Bosnian", "bs"),
    ("Bulgarian", "bg"),
    ("Catalan", "ca"),
    ("Cebuano", "ceb"),
    ("Chinese (Simplified)", "zh-CN"),
    ("Chinese (Traditional)", "zh-TW"),
    ("Corsican", "co"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Esperanto", "eo"),
    ("Estonian", "et"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("Frisian", "fy"),
    ("Galician", "gl"),
    ("Georgian", "ka"),
    ("German", "de"),
    ("Greek", "el"),
    ("Gujarati", "gu"),
    ("Haitian Creole", "ht"),
    ("Hausa", "ha"),
    ("Hawaiian", "haw"),
    ("Hebrew", "he"),
    ("Hindi", "hi"),
    ("Hmong", "hmn"),
    ("Hungarian", "hu"),
    ("Icelandic", "is"),
    ("Igbo", "ig"),
    ("Indonesian", "id"),
    ("Irish", "ga"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Javanese", "jv"),
    ("Kannada", "kn"),
    ("Kazakh", "kk"),
    ("Khmer", "km"),
    ("Kinyarwanda", "rw"),
    ("Korean", "ko"),
    ("Kurdish", "ku"),
    ("Kyrgyz", "ky"),
    ("Lao", "lo"),
    ("Latin", "la"),
    ("Latvian", "lv"),
    ("Lithuanian", "lt"),
    ("Luxembourgish", "lb"),
    ("Macedonian", "mk"),
    ("Malagasy", "mg"),
    ("Malay", "ms"),
    ("Malayalam", "ml"),
    ("Maltese", "mt"),
    ("Maori", "mi"),
    ("Marathi", "mr"),
    ("Mongolian", "mn"),
    ("Myanmar (Burmese)", "my"),
    ("Nepali", "ne"),
    ("Norwegian", "no"),
    ("Nyanja (Chichewa)", "ny"),
    ("Odia (Oriya)", "or"),
    ("Pashto", "ps"),
    ("Persian", "fa"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Punjabi", "pa"),
    ("Romanian", "ro"),
    ("Russian", "ru"),
    ("Samoan", "sm"),
    ("Scots Gaelic", "gd"),
    ("Serbian", "sr"),
    ("Sesotho", "st"),
    ("Shona", "sn"),
    ("Sindhi", "sd"),
    ("Sinhala", "si"),
    ("Slovak", "sk"),
    ("Slovenian", "sl"),
    ("Somali", "so"),
    ("Spanish", "es"),
    ("Sundanese", "su"),
    ("Swahili", "sw"),
    ("Swedish", "sv"),
    ("Tagalog (Filipino)", "tl"),
    ("Tajik", "tg"),
    ("Tamil", "ta"),
    ("Tatar", "tt"),
    ("Telugu", "te"),
    ("Thai", "th"),
    ("Turkish", "tr"),
    ("Turkmen", "tk"),
    ("Ukrainian", "uk"),
    ("Urdu", "ur"),
    ("Uyghur", "ug"),
    ("Uzbek", "uz"),
    ("Vietnamese", "vi"),
    ("Welsh", "cy"),
    ("Xhosa", "xh"),
    ("Yiddish", "yi"),
    ("Yoruba", "yo"),
    ("Zulu", "zu"),
];

/// Older or alternative codes Google also accepts as targets
const CODE_ALIASES: &[&str] = &["zh", "iw", "jw", "fil"];

/// Language name → code for every supported target language
pub fn list_supported_languages() -> BTreeMap<&'static str, &'static str> {
    SUPPORTED_LANGUAGES.iter().copied().collect()
}

/// Whether `code` is in the catalog or is a known alias, ignoring ASCII case
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(_, known)| known)
        .chain(CODE_ALIASES)
        .any(|known| known.eq_ignore_ascii_case(code))
}

/// Check that a language code is present and well-formed
///
/// Only ASCII alphanumerics, hyphens and underscores are accepted.
pub fn validate_language_code(code: &str) -> MarkupResult<()> {
    if code.trim().is_empty() {
        return Err(MarkupError::Validation(
            "Please provide a target language.".to_string(),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MarkupError::Validation(format!(
            "Invalid characters in target language code: {}",
            code
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let languages = list_supported_languages();
        assert_eq!(languages.get("Spanish"), Some(&"es"));
        assert_eq!(languages.get("Chinese (Simplified)"), Some(&"zh-CN"));
        assert_eq!(languages.len(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("es"));
        assert!(is_supported("zh-cn"));
        assert!(is_supported("ZH-TW"));
        assert!(!is_supported("xx"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_aliases_accepted_but_not_listed() {
        for alias in ["zh", "iw", "jw", "fil", "FIL"] {
            assert!(is_supported(alias), "{} should be accepted", alias);
        }
        let codes: Vec<&str> = list_supported_languages().into_values().collect();
        assert!(!codes.contains(&"iw"));
        assert!(codes.contains(&"he"));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|(_, c)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn test_validate_language_code() {
        assert!(validate_language_code("es").is_ok());
        assert!(validate_language_code("zh-CN").is_ok());
        assert!(validate_language_code("pt_BR").is_ok());
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("  ").is_err());
        assert!(validate_language_code("en@US").is_err());
    }

    #[test]
    fn test_validate_language_code_messages() {
        match validate_language_code("fr#bad") {
            Err(MarkupError::Validation(msg)) => assert!(msg.contains("Invalid characters")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}
