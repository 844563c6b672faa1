/// Trim and collapse every run of whitespace into a single space.
fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case- and whitespace-insensitive identity of a product name.
///
/// Two names with the same key are the same logical product and must carry
/// the same weight. The key is taken from the display form, so a name and
/// the display name stored for it always share a key, even where case
/// mapping is not reversible (`ſ` upper-cases to `S`).
pub fn canonical_key(name: &str) -> String {
    display_name(name).to_lowercase()
}

/// Name shown to users and stored back after every write.
///
/// The whole string is lower-cased and only its first character upper-cased.
/// All-whitespace input yields an empty string.
pub fn display_name(name: &str) -> String {
    let lowered = collapse_whitespace(name).to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key(" Rice "), "rice");
        assert_eq!(canonical_key("RICE"), "rice");
        assert_eq!(canonical_key("Brown \t  Rice\n"), "brown rice");
        assert_eq!(canonical_key("   "), "");
    }

    #[test]
    fn test_canonical_key_unicode() {
        assert_eq!(canonical_key("ГРЕЧКА"), "гречка");
        assert_eq!(canonical_key("  Сыр  Российский "), "сыр российский");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(" rice "), "Rice");
        assert_eq!(display_name("BROWN   RICE"), "Brown rice");
        assert_eq!(display_name("гречка"), "Гречка");
        assert_eq!(display_name("  \t "), "");
    }

    #[test]
    fn test_display_name_matches_key() {
        for name in ["Oats", " oats", "OATS  ", "ſalt", "ıce", "ςoup", "Σoup"] {
            assert_eq!(canonical_key(&display_name(name)), canonical_key(name));
        }
    }

    #[test]
    fn test_long_s_shares_key_with_s() {
        assert_eq!(display_name("ſalt"), "Salt");
        assert_eq!(canonical_key("ſalt"), canonical_key("salt"));
        assert_eq!(canonical_key("ſalt"), "salt");
    }
}
