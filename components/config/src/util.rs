use std::path::PathBuf;
use std::str::FromStr;

pub fn parse<T: FromStr>(s: &str, default: T) -> T {
    s.parse().unwrap_or(default)
}

/// Accepts `true`/`false` in any case, or a binary digit
pub fn parse_boolean(value: &str, default: bool) -> bool {
    if value.eq_ignore_ascii_case("true") {
        true
    } else if value.eq_ignore_ascii_case("false") {
        false
    } else {
        u8::from_str_radix(value, 2).map(|v| v == 1).unwrap_or(default)
    }
}

/// Empty values unset the path
pub fn some_path(value: &str) -> Option<PathBuf> {
    match value.trim() {
        "" => None,
        value => Some(PathBuf::from(value)),
    }
}
