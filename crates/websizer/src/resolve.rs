//! Link resolution
//!
//! Relative links are anchored at the root of the linking page's origin and
//! path-cleaned: `asset.css` on `http://host/dir/page.html` resolves to
//! `http://host/asset.css`, not `http://host/dir/asset.css`. This is not
//! RFC 3986 reference resolution.
//!
//! Scheme-relative links (`//cdn.example.com/x.js`) are the one deliberate
//! exception: they take the page's scheme and keep their own host, so they
//! are fetched from `cdn.example.com` rather than path-cleaned into
//! `/cdn.example.com/x.js` on the page's host.

use crate::error::SizeError;
use tracing::debug;
use url::Url;

/// Resolve a raw `href`/`src` value found on `page`
///
/// Returns `Ok(None)` for links that are not network transfers
/// (`data:`, `mailto:`, `javascript:` and other non-HTTP schemes).
pub fn resolve_link(page: &Url, raw: &str) -> Result<Option<Url>, SizeError> {
    let raw = raw.trim();
    let invalid = |source: url::ParseError| SizeError::InvalidUrl {
        url: raw.to_string(),
        source,
    };

    let resolved = if raw.starts_with("//") {
        // Scheme-relative: borrow the page's scheme
        page.join(raw).map_err(invalid)?
    } else {
        match Url::parse(raw) {
            Ok(absolute) => absolute,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                page.join(&clean_rooted_path(raw)).map_err(invalid)?
            }
            Err(e) => return Err(invalid(e)),
        }
    };

    if !is_http(&resolved) {
        debug!(link = raw, scheme = resolved.scheme(), "Skipping non-HTTP link");
        return Ok(None);
    }

    Ok(Some(without_fragment(resolved)))
}

/// Check that a URL can be fetched over HTTP
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.has_host()
}

/// Clean `path` as if prefixed with `/`
///
/// Collapses `.` and `..` segments and redundant separators. `..` never
/// climbs above the root, and a trailing separator is dropped.
pub fn clean_rooted_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    fn resolve(page_url: &str, raw: &str) -> String {
        resolve_link(&page(page_url), raw)
            .unwrap()
            .expect("link should resolve")
            .to_string()
    }

    #[test]
    fn test_clean_rooted_path() {
        assert_eq!(clean_rooted_path(""), "/");
        assert_eq!(clean_rooted_path("."), "/");
        assert_eq!(clean_rooted_path("./favicon.ico"), "/favicon.ico");
        assert_eq!(clean_rooted_path("a//b///c"), "/a/b/c");
        assert_eq!(clean_rooted_path("a/./b/../c"), "/a/c");
        assert_eq!(clean_rooted_path("../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean_rooted_path("/dir/"), "/dir");
    }

    #[test]
    fn test_relative_link_is_root_anchored() {
        assert_eq!(
            resolve("http://host/", "./favicon.ico"),
            "http://host/favicon.ico"
        );
        assert_eq!(
            resolve("http://host/dir/page.html", "asset.css"),
            "http://host/asset.css"
        );
        assert_eq!(
            resolve("http://host/dir/page.html", "../img/./logo.png"),
            "http://host/img/logo.png"
        );
    }

    #[test]
    fn test_relative_link_keeps_page_origin() {
        assert_eq!(
            resolve("https://host:8443/a/b", "/static//app.js"),
            "https://host:8443/static/app.js"
        );
    }

    #[test]
    fn test_relative_link_keeps_query_drops_fragment() {
        assert_eq!(
            resolve("http://host/", "style.css?v=3#top"),
            "http://host/style.css?v=3"
        );
    }

    #[test]
    fn test_absolute_link_passes_through() {
        assert_eq!(
            resolve("http://host/dir/page.html", "https://cdn.example.com/lib/x.js?v=1"),
            "https://cdn.example.com/lib/x.js?v=1"
        );
        assert_eq!(
            resolve("http://other/", "http://host/a/../b.css"),
            "http://host/b.css"
        );
    }

    #[test]
    fn test_scheme_relative_link_uses_page_scheme() {
        assert_eq!(
            resolve("https://host/page", "//cdn.example.com/font.woff2"),
            "https://cdn.example.com/font.woff2"
        );
    }

    #[test]
    fn test_non_http_links_are_skipped() {
        let base = page("http://host/");
        assert!(resolve_link(&base, "data:image/png;base64,AAAA").unwrap().is_none());
        assert!(resolve_link(&base, "mailto:someone@example.com").unwrap().is_none());
        assert!(resolve_link(&base, "javascript:void(0)").unwrap().is_none());
    }

    #[test]
    fn test_malformed_link_is_invalid_url() {
        let err = resolve_link(&page("http://host/"), "http://[::1").unwrap_err();
        assert!(matches!(err, SizeError::InvalidUrl { .. }));
    }
}
