use url::form_urlencoded;

/// Extracts the value of a query parameter from an absolute or relative URL
///
/// The query string (everything after the first `?` and before any `#`) is
/// split into discrete `key=value` pairs and decoded with
/// `application/x-www-form-urlencoded` rules. The first pair whose key is
/// exactly `key` wins.
///
/// # Returns
///
/// * `Some(String)` - The decoded, non-empty value
/// * `None` - No query string, no such key, or an empty value
///
/// # Examples
///
/// ```
/// use softcon_harvest::url::extract_query_token;
///
/// let url = "https://softcon.ajou.ac.kr/works/works_prev.asp?uid=42&wTerm=2024-1";
/// assert_eq!(extract_query_token(url, "uid").as_deref(), Some("42"));
/// assert_eq!(extract_query_token(url, "wTerm").as_deref(), Some("2024-1"));
/// assert_eq!(extract_query_token(url, "category"), None);
/// ```
pub fn extract_query_token(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
