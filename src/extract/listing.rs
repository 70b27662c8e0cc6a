//! Project reference discovery from a listing page

use crate::config::SiteProfile;
use crate::extract::query::{attr_of, find_all, text_of};
use crate::model::{ProjectReference, UNTITLED};
use crate::url::{normalize, ProjectTokens};
use scraper::Html;
use std::collections::HashSet;

/// Parses a listing document into an ordered, deduplicated list of references
///
/// # Link Selection Rules
///
/// **Include:** `<a href="...">` whose href contains one of the site's
/// detail markers (`works.asp?uid=`, `works_prev.asp?uid=`).
///
/// **Exclude:** hrefs containing the script marker (`javascript:`), which
/// are UI hooks rather than navigable links.
///
/// Each qualifying href is normalized against the site base URL. When the
/// same normalized URL appears under several anchors (a thumbnail and its
/// caption, typically) only the first occurrence is kept, title included.
///
/// This performs no I/O.
///
/// # Example
///
/// ```
/// use softcon_harvest::config::SiteProfile;
/// use softcon_harvest::extract::discover;
///
/// let html = r#"<a href="works.asp?uid=3">Smart Campus</a>"#;
/// let refs = discover(html, &SiteProfile::default());
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].url, "https://softcon.ajou.ac.kr/works.asp?uid=3");
/// assert_eq!(refs[0].uid.as_deref(), Some("3"));
/// ```
pub fn discover(listing_html: &str, site: &SiteProfile) -> Vec<ProjectReference> {
    let document = Html::parse_document(listing_html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut references = Vec::new();

    for anchor in find_all(document.root_element(), "a[href]") {
        let href = match attr_of(anchor, "href") {
            Some(href) => href,
            None => continue,
        };

        if !site.is_detail_href(&href) {
            continue;
        }

        let url = normalize(site.base(), &href);
        if !seen.insert(url.clone()) {
            tracing::trace!("Skipping duplicate reference {}", url);
            continue;
        }

        let title = text_of(anchor);
        let tokens = ProjectTokens::from_url(&url);

        references.push(ProjectReference {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            url,
            uid: tokens.uid,
            term: tokens.term,
        });
    }

    tracing::debug!("Discovered {} project references", references.len());
    references
}
