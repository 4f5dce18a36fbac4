use serde_json::Value;

/// Keys tried, in order, on each attachment object.
const URL_FIELDS: &[&str] = &["url", "permalink", "url_private", "permalink_public"];

/// Attachment URLs from a message's JSON metadata (`{"files": [...]}`).
///
/// Entries may be objects carrying one of [`URL_FIELDS`] or bare URL strings;
/// anything else is skipped. Returns `None` for unparsable JSON, a missing or
/// non-array `files`, or when no URL survives.
pub fn extract_files_from_json(json: &str) -> Option<Vec<String>> {
    let data: Value = serde_json::from_str(json).ok()?;
    let files = data.as_object()?.get("files")?.as_array()?;

    let urls: Vec<String> = files
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => URL_FIELDS
                .iter()
                .filter_map(|key| obj.get(*key))
                .find_map(|v| v.as_str())
                .map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();

    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}
