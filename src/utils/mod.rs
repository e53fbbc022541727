//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Capitalize the first letter of each run of letters, lowercasing the rest.
///
/// Any non-alphabetic character starts a new word, so `"BRANDS-HATCH"`
/// becomes `"Brands-Hatch"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if !c.is_alphabetic() {
            out.push(c);
            in_word = false;
        } else if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
            in_word = true;
        }
    }
    out
}

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
