//! Utility functions and constants for HTML processing.

/// Void (self-closing) HTML elements
///
/// See <http://www.w3.org/TR/html-markup/syntax.html#syntax-elements>
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Characters that may never appear in an attribute name
const FORBIDDEN_ATTRIBUTE_CHARS: &[char] = &['"', '\'', '>', '/', '='];

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a string can be used as an attribute name
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || FORBIDDEN_ATTRIBUTE_CHARS.contains(&c)
        })
}

/// Escape HTML attribute value
pub fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use as element content
pub fn escape_html_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

/// Number of characters (not bytes) in a string
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Take the first `n` characters of a string
pub fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
