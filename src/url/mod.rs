//! URL handling module
//!
//! This module resolves hrefs found in catalog markup into absolute URLs and
//! pulls identifier tokens (`uid`, `wTerm`) out of query strings.

mod normalize;
mod query;

// Re-export main functions
pub use normalize::normalize;
pub use query::extract_query_token;

pub(crate) use normalize::has_http_scheme;

/// Query parameter carrying the per-project identifier
pub const UID_PARAM: &str = "uid";

/// Query parameter carrying the academic term on archived pages
pub const TERM_PARAM: &str = "wTerm";

/// Identity tokens derived from a project URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTokens {
    pub uid: Option<String>,
    pub term: Option<String>,
}

impl ProjectTokens {
    /// Derives the `uid` and term tokens from a URL's query string
    pub fn from_url(url: &str) -> Self {
        Self {
            uid: extract_query_token(url, UID_PARAM),
            term: extract_query_token(url, TERM_PARAM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_from_archived_url() {
        let tokens =
            ProjectTokens::from_url("https://softcon.ajou.ac.kr/works/works_prev.asp?uid=1832&wTerm=2024-1");
        assert_eq!(tokens.uid.as_deref(), Some("1832"));
        assert_eq!(tokens.term.as_deref(), Some("2024-1"));
    }

    #[test]
    fn test_tokens_from_current_url() {
        let tokens = ProjectTokens::from_url("https://softcon.ajou.ac.kr/works/works.asp?uid=2001");
        assert_eq!(tokens.uid.as_deref(), Some("2001"));
        assert_eq!(tokens.term, None);
    }

    #[test]
    fn test_tokens_from_plain_url() {
        assert_eq!(
            ProjectTokens::from_url("https://softcon.ajou.ac.kr/"),
            ProjectTokens::default()
        );
    }
}
