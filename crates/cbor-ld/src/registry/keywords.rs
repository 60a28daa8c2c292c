//! The fixed JSON-LD keyword table.
//!
//! Keywords own the even ids `0..=54` and are never reassigned.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// Reserved keywords and their ids.
pub const KEYWORDS: [(&str, u64); 28] = [
    ("@context", 0),
    ("@type", 2),
    ("@id", 4),
    ("@value", 6),
    ("@direction", 8),
    ("@graph", 10),
    ("@included", 12),
    ("@index", 14),
    ("@json", 16),
    ("@language", 18),
    ("@list", 20),
    ("@nest", 22),
    ("@reverse", 24),
    ("@base", 26),
    ("@container", 28),
    ("@default", 30),
    ("@embed", 32),
    ("@explicit", 34),
    ("@none", 36),
    ("@omitDefault", 38),
    ("@prefix", 40),
    ("@preserve", 42),
    ("@protected", 44),
    ("@requireAll", 46),
    ("@set", 48),
    ("@version", 50),
    ("@vocab", 52),
    ("@propagate", 54),
];

lazy_static! {
    static ref KEYWORD_IDS: FxHashMap<&'static str, u64> = KEYWORDS.iter().copied().collect();
}

/// Returns the fixed id of a keyword.
pub fn keyword_id(term: &str) -> Option<u64> {
    KEYWORD_IDS.get(term).copied()
}

/// Returns true if `term` is one of the reserved keywords.
pub fn is_keyword(term: &str) -> bool {
    KEYWORD_IDS.contains_key(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_ids_even_and_distinct() {
        let mut ids: Vec<u64> = KEYWORDS.iter().map(|(_, id)| *id).collect();
        ids.sort();
        assert_eq!(ids, (0..=54).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(keyword_id("@context"), Some(0));
        assert_eq!(keyword_id("@type"), Some(2));
        assert_eq!(keyword_id("@id"), Some(4));
        assert_eq!(keyword_id("@propagate"), Some(54));
        assert_eq!(keyword_id("name"), None);
        assert!(is_keyword("@protected"));
        assert!(!is_keyword("@unknown"));
    }
}
