pub mod sed;

use regex::Regex;
use std::sync::OnceLock;

fn leading_digits_regex() -> &'static Regex {
    static MAJOR_RE: OnceLock<Regex> = OnceLock::new();
    MAJOR_RE.get_or_init(|| Regex::new(r"^([0-9]+)").expect("invalid major version regex"))
}

/// Leading run of digits in `version`, or `version` itself when it has none.
///
/// `"9.4"` gives `"9"`, `"8-minimal"` gives `"8"` and `"latest"` stays
/// `"latest"`. Applying it twice gives the same answer as applying it once.
pub fn major_version(version: &str) -> &str {
    leading_digits_regex()
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map_or(version, |m| m.as_str())
}
