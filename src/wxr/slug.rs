//! Permalink slugs.

use deunicode::deunicode;

/// Lowercase ASCII slug: transliterate, then collapse every run of
/// non-alphanumeric characters into a single hyphen.
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
