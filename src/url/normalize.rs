/// Resolves an href found in catalog markup against the site base URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. `./path` → `base + /path` (the leading dot is stripped)
/// 3. `/path` → `base + /path`
/// 4. Anything without an `http://` or `https://` scheme → `base + "/" + href`
/// 5. Absolute URLs are returned unchanged
///
/// `base` is expected without a trailing slash; a trailing slash is
/// tolerated and ignored. Applying the function to its own output yields the
/// same string, since every result carries an HTTP(S) scheme.
///
/// # Examples
///
/// ```
/// use softcon_harvest::url::normalize;
///
/// let base = "https://softcon.ajou.ac.kr";
/// assert_eq!(
///     normalize(base, "./works/works.asp?uid=7"),
///     "https://softcon.ajou.ac.kr/works/works.asp?uid=7"
/// );
/// assert_eq!(
///     normalize(base, "works.asp?uid=7"),
///     "https://softcon.ajou.ac.kr/works.asp?uid=7"
/// );
/// ```
pub fn normalize(base: &str, href: &str) -> String {
    let base = base.trim_end_matches('/');
    let href = href.trim();

    if let Some(rest) = href.strip_prefix("./") {
        return format!("{}/{}", base, rest);
    }

    if href.starts_with('/') {
        return format!("{}{}", base, href);
    }

    if !has_http_scheme(href) {
        return format!("{}/{}", base, href);
    }

    href.to_string()
}

/// Returns true if the string starts with `http://` or `https://` (any case)
pub(crate) fn has_http_scheme(href: &str) -> bool {
    let lower = href
        .get(..8)
        .unwrap_or(href)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://softcon.ajou.ac.kr";

    #[test]
    fn test_dot_relative() {
        assert_eq!(
            normalize(BASE, "./works/works.asp?uid=12"),
            "https://softcon.ajou.ac.kr/works/works.asp?uid=12"
        );
    }

    #[test]
    fn test_rooted() {
        assert_eq!(
            normalize(BASE, "/upload/thumb.png"),
            "https://softcon.ajou.ac.kr/upload/thumb.png"
        );
    }

    #[test]
    fn test_bare_relative() {
        assert_eq!(
            normalize(BASE, "works_prev.asp?uid=3&wTerm=2023-2"),
            "https://softcon.ajou.ac.kr/works_prev.asp?uid=3&wTerm=2023-2"
        );
    }

    #[test]
    fn test_absolute_unchanged() {
        let href = "http://other.example.org/works.asp?uid=5";
        assert_eq!(normalize(BASE, href), href);
    }

    #[test]
    fn test_uppercase_scheme_unchanged() {
        let href = "HTTPS://softcon.ajou.ac.kr/works/works.asp?uid=5";
        assert_eq!(normalize(BASE, href), href);
    }

    #[test]
    fn test_scheme_like_prefix_is_relative() {
        // "httpdocs" is a path segment, not a scheme
        assert_eq!(
            normalize(BASE, "httpdocs/a.png"),
            "https://softcon.ajou.ac.kr/httpdocs/a.png"
        );
    }

    #[test]
    fn test_trailing_slash_on_base() {
        assert_eq!(
            normalize("https://softcon.ajou.ac.kr/", "/a"),
            "https://softcon.ajou.ac.kr/a"
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(
            normalize(BASE, "  /works/works.asp?uid=1 \n"),
            "https://softcon.ajou.ac.kr/works/works.asp?uid=1"
        );
    }

    #[test]
    fn test_idempotence_for_all_shapes() {
        for href in [
            "/works/works.asp?uid=1",
            "./works/works.asp?uid=1",
            "works.asp?uid=1",
            "https://softcon.ajou.ac.kr/works/works.asp?uid=1",
        ] {
            let once = normalize(BASE, href);
            let twice = normalize(BASE, &once);
            assert_eq!(once, twice, "normalization not idempotent for {}", href);
        }
    }
}
