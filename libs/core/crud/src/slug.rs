/// Lowercase, hyphen-separated, URL-safe form of a human-readable name.
///
/// Non-ASCII text is transliterated first, so accented letters keep their
/// base letter. Every remaining run of characters that are not ASCII letters
/// or digits becomes a single `-`; leading and trailing separators are
/// dropped.
///
/// ```
/// assert_eq!(crud::slugify("Men's  Shoes"), "men-s-shoes");
/// assert_eq!(crud::slugify("  USB-C / Lightning "), "usb-c-lightning");
/// assert_eq!(crud::slugify("Café Crème"), "cafe-creme");
/// ```
pub fn slugify(input: &str) -> String {
    let folded = deunicode::deunicode(input);
    let mut slug = String::with_capacity(folded.len());
    let mut pending_separator = false;

    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
