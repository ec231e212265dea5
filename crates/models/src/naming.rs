//! Username scheme checks.
//!
//! Legacy accounts are identified as `username#1234`. Migrated accounts carry the
//! discriminator `"0"` and a globally unique lowercase username.

use regex::Regex;

/// Discriminator assigned to users who migrated to a unique username
pub const UNIQUE_DISCRIMINATOR: &str = "0";

lazy_static::lazy_static! {
    pub static ref UNIQUE_USERNAME_REGEX: Regex = Regex::new(r"^[a-z0-9_.\-]{2,32}$").unwrap();
}

/// 2-32 characters of lowercase ASCII letters, digits, `_`, `-` or `.`, with no two dots in a row.
pub fn is_unique_username_valid(username: &str) -> bool {
    UNIQUE_USERNAME_REGEX.is_match(username) && !username.contains("..")
}

/// A user still uses `name#tag` naming if a discriminator is present and isn't the migrated sentinel.
pub fn uses_legacy_naming(discriminator: Option<&str>) -> bool {
    matches!(discriminator, Some(d) if d != UNIQUE_DISCRIMINATOR)
}

/// Renders `username#discriminator` for legacy users, otherwise the bare username.
///
/// With `bidirectional` set the username is wrapped in a Unicode left-to-right isolate
/// so right-to-left names cannot reorder the discriminator.
pub fn username_and_discriminator(username: &str, discriminator: Option<&str>, bidirectional: bool) -> String {
    let mut out = String::with_capacity(username.len() + 12);

    if bidirectional {
        out.push('\u{2066}');
        out.push_str(username);
        out.push('\u{2069}');
    } else {
        out.push_str(username);
    }

    if let Some(discriminator) = discriminator.filter(|d| uses_legacy_naming(Some(d))) {
        out.push('#');
        out.push_str(discriminator);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_username() {
        assert!(is_unique_username_valid("ab"));
        assert!(is_unique_username_valid("a.b-c_1"));
        assert!(is_unique_username_valid(&"a".repeat(32)));

        assert!(!is_unique_username_valid("a"));
        assert!(!is_unique_username_valid("ab..cd"));
        assert!(!is_unique_username_valid("AB12"));
        assert!(!is_unique_username_valid(&"ab3".repeat(11)));
        assert!(!is_unique_username_valid("white space"));
        assert!(!is_unique_username_valid(""));
    }

    #[test]
    fn test_legacy_naming() {
        assert!(!uses_legacy_naming(None));
        assert!(!uses_legacy_naming(Some("0")));
        assert!(uses_legacy_naming(Some("4492")));
    }

    #[test]
    fn test_format() {
        assert_eq!(username_and_discriminator("nelly", Some("1337"), false), "nelly#1337");
        assert_eq!(username_and_discriminator("nelly", Some("0"), false), "nelly");
        assert_eq!(username_and_discriminator("nelly", None, false), "nelly");
        assert_eq!(username_and_discriminator("nelly", Some("1337"), true), "\u{2066}nelly\u{2069}#1337");
        assert_eq!(username_and_discriminator("nelly", None, true), "\u{2066}nelly\u{2069}");
    }
}
