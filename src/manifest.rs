//! Addon manifest URL handling.

const STREMIO_SCHEME: &str = "stremio://";
const MANIFEST_FILE: &str = "manifest.json";

/// Normalize an addon base URL into its `https://` manifest URL.
///
/// Malformed input is not rejected here; it surfaces when the request is
/// built.
///
/// ```
/// use addon_wrapper::manifest::manifest_url;
///
/// assert_eq!(manifest_url("stremio://example.com/"), "https://example.com/manifest.json");
/// ```
#[must_use]
pub fn manifest_url(base: &str) -> String {
    let url = match base.strip_prefix(STREMIO_SCHEME) {
        Some(rest) => format!("https://{rest}"),
        None => base.to_string(),
    };
    let url = url.strip_suffix('/').unwrap_or(&url);

    if url.ends_with(MANIFEST_FILE) {
        url.to_string()
    } else {
        format!("{url}/{MANIFEST_FILE}")
    }
}

/// Manifest URL with the trailing `/manifest.json` removed.
///
/// Every addon resource (`/stream/...`, `/meta/...`) hangs off this base.
#[must_use]
pub fn manifest_base(manifest_url: &str) -> &str {
    manifest_url
        .strip_suffix(MANIFEST_FILE)
        .map_or(manifest_url, |base| base.strip_suffix('/').unwrap_or(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_stremio_scheme() {
        assert_eq!(
            manifest_url("stremio://example.com/"),
            "https://example.com/manifest.json"
        );
        assert_eq!(
            manifest_url("stremio://addon.example.com/abc/manifest.json"),
            "https://addon.example.com/abc/manifest.json"
        );
    }

    #[test]
    fn test_existing_manifest_unchanged() {
        assert_eq!(
            manifest_url("https://example.com/manifest.json"),
            "https://example.com/manifest.json"
        );
    }

    #[test]
    fn test_strips_single_trailing_slash() {
        assert_eq!(
            manifest_url("https://example.com/config"),
            "https://example.com/config/manifest.json"
        );
        assert_eq!(
            manifest_url("https://example.com/config/"),
            "https://example.com/config/manifest.json"
        );
        // Only one slash is stripped
        assert_eq!(
            manifest_url("https://example.com//"),
            "https://example.com//manifest.json"
        );
    }

    #[test]
    fn test_never_double_slash_before_manifest() {
        for input in [
            "stremio://a.b/",
            "https://a.b",
            "https://a.b/x/",
            "http://localhost:7000/",
        ] {
            let out = manifest_url(input);
            assert!(out.ends_with("/manifest.json"), "{out}");
            assert!(!out.ends_with("//manifest.json"), "{out}");
        }
    }

    #[test]
    fn test_manifest_base() {
        assert_eq!(
            manifest_base("https://example.com/cfg/manifest.json"),
            "https://example.com/cfg"
        );
        assert_eq!(manifest_base("https://example.com"), "https://example.com");
    }
}
