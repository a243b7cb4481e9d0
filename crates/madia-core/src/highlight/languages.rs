//! Grammar registration and language name aliases.

use tree_sitter_highlight::HighlightConfiguration;

use super::HighlightError;

/// Normalize a code fence tag to a canonical language name.
///
/// Returns `None` for languages without a bundled grammar.
pub fn normalize_language_name(lang: &str) -> Option<&'static str> {
    match lang.trim().to_lowercase().as_str() {
        "rust" | "rs" => Some("rust"),
        "python" | "py" | "python3" => Some("python"),
        "bash" | "sh" | "shell" | "zsh" => Some("bash"),
        "json" | "jsonc" => Some("json"),
        _ => None,
    }
}

/// Canonical names of every bundled grammar, sorted.
pub fn supported_languages() -> &'static [&'static str] {
    &["bash", "json", "python", "rust"]
}

/// Compile the highlight configuration for a canonical language name.
pub(super) fn configuration(
    canonical: &'static str,
    recognized: &[&str],
) -> Result<HighlightConfiguration, HighlightError> {
    let (language, highlights, injections): (tree_sitter::Language, &str, &str) = match canonical {
        "bash" => (
            tree_sitter_bash::LANGUAGE.into(),
            tree_sitter_bash::HIGHLIGHT_QUERY,
            "",
        ),
        "rust" => (
            tree_sitter_rust::LANGUAGE.into(),
            tree_sitter_rust::HIGHLIGHTS_QUERY,
            tree_sitter_rust::INJECTIONS_QUERY,
        ),
        "python" => (
            tree_sitter_python::LANGUAGE.into(),
            tree_sitter_python::HIGHLIGHTS_QUERY,
            "",
        ),
        "json" => (
            tree_sitter_json::LANGUAGE.into(),
            tree_sitter_json::HIGHLIGHTS_QUERY,
            "",
        ),
        other => return Err(HighlightError::UnknownLanguage(other.to_string())),
    };

    let mut config = HighlightConfiguration::new(language, canonical, highlights, injections, "")
        .map_err(|source| HighlightError::Query {
            language: canonical,
            source,
        })?;
    config.configure(recognized);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_language_name_aliases() {
        assert_eq!(normalize_language_name("rs"), Some("rust"));
        assert_eq!(normalize_language_name("Python3"), Some("python"));
        assert_eq!(normalize_language_name(" sh "), Some("bash"));
        assert_eq!(normalize_language_name("jsonc"), Some("json"));
    }

    #[test]
    fn test_normalize_language_name_unknown() {
        assert_eq!(normalize_language_name(""), None);
        assert_eq!(normalize_language_name("brainfuck"), None);
    }

    #[test]
    fn test_supported_languages_is_sorted() {
        let langs = supported_languages();
        let mut sorted = langs.to_vec();
        sorted.sort_unstable();
        assert_eq!(langs, sorted.as_slice());
    }

    #[test]
    fn test_every_supported_language_compiles() {
        for lang in supported_languages() {
            assert!(configuration(lang, &["string"]).is_ok(), "{lang} failed");
        }
    }

    #[test]
    fn test_unknown_canonical_rejected() {
        assert!(matches!(
            configuration("cobol", &[]),
            Err(HighlightError::UnknownLanguage(_))
        ));
    }
}
