use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    // Script whitespace class: Unicode whitespace plus the BOM, which some
    // hosts leave at the front of caption text.
    static ref LEADING_WHITESPACE: Regex =
        Regex::new(r"^[\s\u{FEFF}]+").expect("leading whitespace pattern");
}

/// Strips every leading script-whitespace character; the rest of the string,
/// trailing whitespace included, is returned untouched.
pub(crate) fn trim_leading(src: &str) -> String {
    let end = LEADING_WHITESPACE
        .find(src)
        .ok()
        .flatten()
        .map(|m| m.end())
        .unwrap_or(0);
    src[end..].to_string()
}

/// True iff `prefix` occurs at position 0 of `value`.
pub(crate) fn starts_with(value: &str, prefix: &str) -> bool {
    value.starts_with(prefix)
}

/// True iff `suffix` terminates exactly at the end of `value`.
pub(crate) fn ends_with(value: &str, suffix: &str) -> bool {
    value.ends_with(suffix)
}
