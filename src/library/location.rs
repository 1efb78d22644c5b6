use std::path::PathBuf;

use url::Url;

/// Turn a library location into a local path.
///
/// `file://` URLs (including `file://localhost/...`) are percent-decoded;
/// anything else is taken as a plain path.
pub fn resolve_location(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let is_file_url = raw
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file://"));
    if is_file_url {
        if let Ok(url) = Url::parse(raw) {
            if let Ok(path) = url.to_file_path() {
                return path;
            }
        }
        // Malformed URL: strip the scheme and keep the rest verbatim.
        let rest = &raw[7..];
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return PathBuf::from(rest);
    }
    PathBuf::from(raw)
}
