//! Keyword matching over finalized speech transcripts.
//!
//! The speech recognizer itself is an external collaborator; this module only
//! decides whether a transcript it produced contains an SOS phrase.

use regex::Regex;

/// Matches transcripts against a small SOS keyword set, case-insensitively.
///
/// Keywords match on word boundaries: "I need help now" fires, "helpful"
/// does not.
pub struct PhraseMatcher {
    pattern: Regex,
}

impl PhraseMatcher {
    pub fn new(keywords: &[String]) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let pattern = if alternation.is_empty() {
            // No keywords configured: a pattern that can never match.
            Regex::new(r"\b\B").expect("Invalid fallback pattern")
        } else {
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("Invalid keyword pattern")
        };

        Self { pattern }
    }

    /// Returns the matched phrase (lowercased) when the transcript contains
    /// one of the keywords.
    pub fn match_transcript(&self, transcript: &str) -> Option<String> {
        self.pattern
            .find(transcript)
            .map(|m| m.as_str().to_lowercase())
    }
}

impl Default for PhraseMatcher {
    fn default() -> Self {
        Self::new(&default_keywords())
    }
}

/// Keyword set of the stock build.
pub fn default_keywords() -> Vec<String> {
    vec!["help".to_string(), "sos".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_containing_keyword_matches() {
        let matcher = PhraseMatcher::default();
        assert_eq!(
            matcher.match_transcript("I need help now"),
            Some("help".to_string())
        );
    }

    #[test]
    fn test_unrelated_transcript_does_not_match() {
        let matcher = PhraseMatcher::default();
        assert!(matcher.match_transcript("hello world").is_none());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matcher = PhraseMatcher::default();
        assert_eq!(matcher.match_transcript("HELP"), Some("help".to_string()));
        assert_eq!(
            matcher.match_transcript("please SoS"),
            Some("sos".to_string())
        );
    }

    #[test]
    fn test_keyword_inside_longer_word_does_not_match() {
        let matcher = PhraseMatcher::default();
        assert!(matcher.match_transcript("that was helpful").is_none());
    }

    #[test]
    fn test_custom_keywords() {
        let matcher = PhraseMatcher::new(&["mayday".to_string()]);
        assert_eq!(
            matcher.match_transcript("Mayday, mayday"),
            Some("mayday".to_string())
        );
        assert!(matcher.match_transcript("help").is_none());
    }

    #[test]
    fn test_empty_keyword_set_never_matches() {
        let matcher = PhraseMatcher::new(&[]);
        assert!(matcher.match_transcript("help sos anything").is_none());
    }
}
