//! Line-by-line name matching.

use super::patterns::NAME_PATTERN;

/// Scans extracted text for the first name-shaped substring.
pub struct NameMatcher;

impl NameMatcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self
    }

    /// Apply the name pattern to each line in order; return the first match,
    /// trimmed.
    ///
    /// The pattern searches *within* a line: OCR output often has noise
    /// around a clean name substring. No match is `None`, never an error.
    pub fn first_match(&self, text: &str) -> Option<String> {
        for line in text.lines() {
            let line = line.trim();
            if let Some(found) = NAME_PATTERN.find(line) {
                return Some(found.as_str().trim().to_string());
            }
        }
        None
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_on_clean_line() {
        let matcher = NameMatcher::new();
        let text = "Parish Record\nSmith, Mrs. Jane Doe\n2024";
        assert_eq!(
            matcher.first_match(text),
            Some("Smith, Mrs. Jane Doe".to_string())
        );
    }

    #[test]
    fn test_surrounding_noise_is_ignored() {
        let matcher = NameMatcher::new();
        // Non-letter noise around the name on the same line
        let text = "## Smith, Mrs. Jane Doe ##";
        assert_eq!(
            matcher.first_match(text),
            Some("Smith, Mrs. Jane Doe".to_string())
        );
    }

    #[test]
    fn test_adjacent_letter_noise_is_absorbed() {
        let matcher = NameMatcher::new();
        // Letter runs touching the name are indistinguishable from name
        // tokens: the leading run joins the surname, "Missy" satisfies the
        // honorific via "Miss", and the trailing run joins the given names.
        let text = "xxJones, Missy Anne Carterxx";
        assert_eq!(
            matcher.first_match(text),
            Some("xxJones, Missy Anne Carterxx".to_string())
        );
    }

    #[test]
    fn test_first_matching_line_wins() {
        let matcher = NameMatcher::new();
        let text = "Jones, Miss Anne\nSmith, Mrs. Jane";
        assert_eq!(matcher.first_match(text), Some("Jones, Miss Anne".to_string()));
    }

    #[test]
    fn test_no_match_is_none() {
        let matcher = NameMatcher::new();
        assert_eq!(matcher.first_match("weekly offering\n12.50"), None);
        assert_eq!(matcher.first_match(""), None);
    }
}
