/// Convert a comma-separated tag list into Flickr's space-separated form.
///
/// Each item is trimmed and empty items are dropped, so the result is stable
/// under repeated application.
pub fn normalize(tags: &str) -> String {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
