//! Wildcard sender patterns.

use regex::Regex;

/// A compiled sender rule.
///
/// `*` matches any run of characters (including none); every other
/// character is literal. The match is anchored at the start of the address
/// only, so a pattern without a trailing `*` also matches any address it is
/// a prefix of.
#[derive(Debug, Clone)]
pub struct SenderPattern {
    pattern: String,
    regex: Regex,
}

impl SenderPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated expression exceeds the regex size
    /// limit.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        // (?s) lets `*` cross line breaks in folded header values
        let regex = Regex::new(&format!("^(?s:{body})"))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written in the configuration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Tests an address against the pattern.
    #[must_use]
    pub fn is_match(&self, address: &str) -> bool {
        self.regex.is_match(address)
    }
}

impl std::fmt::Display for SenderPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Tests `address` against a wildcard `pattern` without keeping the
/// compiled form.
#[must_use]
pub fn matches(pattern: &str, address: &str) -> bool {
    SenderPattern::new(pattern).is_ok_and(|p| p.is_match(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wildcard_domain() {
        assert!(matches("*@spam.com", "user@spam.com"));
        assert!(matches("*@spam.com", "@spam.com"));
        assert!(!matches("*@spam.com", "user@ham.com"));
    }

    #[test]
    fn test_exact_pattern() {
        assert!(matches("a@b.com", "a@b.com"));
        assert!(!matches("a@b.com", "a@b.co"));
    }

    #[test]
    fn test_star_matches_anything() {
        assert!(matches("*", "anyone@anywhere.example"));
        assert!(matches("*", ""));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches("", ""));
        assert!(matches("", "a@b.com"));
        assert!(!matches("a@b.com", ""));
    }

    #[test]
    fn test_special_characters_are_literal() {
        assert!(matches("user+tag@x.com", "user+tag@x.com"));
        assert!(!matches("user+tag@x.com", "userrtag@x.com"));
        assert!(!matches("a.b@x.com", "aXb@x.com"));
        assert!(matches("(x)[y]{z}|^$?\\@q", "(x)[y]{z}|^$?\\@q"));
    }

    #[test]
    fn test_inner_wildcard() {
        assert!(matches("news*@*.example", "newsletter@shop.example"));
        assert!(!matches("news*@*.example", "info@shop.example"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!matches("*@Spam.com", "user@spam.com"));
    }

    // Patterns are anchored at the start only: a pattern without a trailing
    // `*` still matches longer addresses that begin with it.
    #[test]
    fn test_prefix_semantics_pinned() {
        assert!(matches("a@b.co", "a@b.com"));
        assert!(matches("promo@", "promo@anything.example"));
        assert!(!matches("b.com", "a@b.com"));
    }

    #[test]
    fn test_display_keeps_source() {
        let pattern = SenderPattern::new("*@spam.com").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(pattern.to_string(), "*@spam.com");
        assert_eq!(pattern.as_str(), "*@spam.com");
    }

    proptest! {
        #[test]
        fn literal_pattern_matches_itself(address in "\\PC{0,40}") {
            let pattern = address.replace('*', "");
            prop_assert!(matches(&pattern, &pattern));
        }

        #[test]
        fn star_matches_everything(address in "\\PC{0,40}") {
            prop_assert!(matches("*", &address));
        }
    }
}
