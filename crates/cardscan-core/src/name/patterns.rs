//! Regex patterns for card name extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Name shape on a card: surname token, a comma or period, an honorific
    // ("Mr"/"Mrs" carrying its own comma or period, or "Miss"), then a greedy
    // run of given-name letters and spaces. Case-sensitive on letters.
    pub static ref NAME_PATTERN: Regex = Regex::new(
        r"[A-Za-z]+[,.]\s*(?:Mrs?[,.]|Miss)\s*[A-Za-z\s]+"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honorific_variants() {
        assert!(NAME_PATTERN.is_match("Smith, Mrs. Jane"));
        assert!(NAME_PATTERN.is_match("Smith, Mrs, Jane"));
        assert!(NAME_PATTERN.is_match("Smith. Mr. John"));
        assert!(NAME_PATTERN.is_match("Smith, Miss Jane"));
    }

    #[test]
    fn test_case_sensitive_honorific() {
        assert!(!NAME_PATTERN.is_match("smith, mrs. jane"));
        assert!(!NAME_PATTERN.is_match("SMITH, MRS. JANE"));
    }

    #[test]
    fn test_requires_separator_after_surname() {
        assert!(!NAME_PATTERN.is_match("Smith Mrs. Jane"));
    }
}
