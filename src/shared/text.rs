/// Reverses HTML-entity-style escaping that transports sometimes apply to
/// path-like parameters before the value is used against the filesystem.
pub fn unescape_html_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
