//! Query key normalization
//!
//! Every cache lookup and every persisted record key goes through
//! [`normalize`] so that inputs differing only by case or surrounding
//! whitespace map to the same cache entry.

/// Canonical cache key for a raw query string.
///
/// Trims leading/trailing whitespace and lower-cases. Pure function with
/// no failure mode; the empty string is a valid (reset) key.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  123 Main  "), "123 main");
        assert_eq!(normalize("\tParis\n"), "paris");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize("PARIS"), "paris");
        assert_eq!(normalize("MiXeD CaSe"), "mixed case");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t \n"), "");
    }

    #[test]
    fn test_interior_whitespace_preserved() {
        assert_eq!(normalize("123  Main   St"), "123  main   st");
    }

    #[test]
    fn test_unicode_lowercase() {
        assert_eq!(normalize("MÜNCHEN"), "münchen");
    }

    // Property: normalization is idempotent.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_idempotent(raw in "\\PC{0,60}") {
            let once = normalize(&raw);
            let twice = normalize(&once);
            prop_assert_eq!(once, twice, "normalize should be idempotent");
        }
    }

    // Property: case and surrounding whitespace never distinguish keys.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_case_whitespace_equivalence(
            core in "[a-zA-Z0-9 ]{1,40}",
            left in "[ \\t]{0,5}",
            right in "[ \\t]{0,5}",
        ) {
            let decorated = format!("{left}{}{right}", core.to_uppercase());
            prop_assert_eq!(
                normalize(&decorated),
                normalize(&core),
                "padding and case should not change the cache key"
            );
        }
    }

    // Property: the output carries no surrounding whitespace.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_output_trimmed(raw in "\\PC{0,60}") {
            let key = normalize(&raw);
            prop_assert_eq!(key.trim(), key.as_str(), "key should already be trimmed");
        }
    }
}
