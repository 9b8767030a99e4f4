/// Fallback slug for titles with no usable characters.
const EMPTY_SLUG: &str = "post";

/// Derive a URL slug from a post title.
///
/// ASCII letters and digits are lowercased, every other run of
/// characters collapses to a single hyphen, and leading/trailing
/// hyphens are trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}
