//! Optional structural lookups over a parsed document
//!
//! Every lookup here returns `None` when the target is missing. An invalid
//! selector is treated the same way, so extraction code never has to
//! distinguish "not on this page" from "not expressible".

use scraper::{ElementRef, Selector};

/// Parses a CSS selector, logging and discarding invalid ones
fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::trace!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// Finds the first descendant of `scope` matching `css`
pub fn find_field<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    let found = scope.select(&selector).next();
    if found.is_none() {
        tracing::trace!("No match for '{}'", css);
    }
    found
}

/// Finds the `n`th (zero-based) descendant of `scope` matching `css`
pub fn find_nth<'a>(scope: ElementRef<'a>, css: &str, n: usize) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    scope.select(&selector).nth(n)
}

/// Collects every descendant of `scope` matching `css`
pub fn find_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Visible text of an element with surrounding whitespace removed
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed attribute value; missing or blank attributes are `None`
pub fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Text of the first match of `css` under `scope`
pub fn field_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    find_field(scope, css).map(text_of)
}

/// Attribute of the first match of `css` under `scope`
pub fn field_attr(scope: ElementRef<'_>, css: &str, name: &str) -> Option<String> {
    find_field(scope, css).and_then(|element| attr_of(element, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const HTML: &str = r#"
        <html><body>
            <div class="card"><p> First </p><img src=" /a.png "></div>
            <div class="card"><p>Second</p><img src=""></div>
        </body></html>
    "#;

    #[test]
    fn test_find_field_first_match() {
        let doc = Html::parse_document(HTML);
        assert_eq!(
            field_text(doc.root_element(), ".card p"),
            Some("First".to_string())
        );
    }

    #[test]
    fn test_find_field_absent() {
        let doc = Html::parse_document(HTML);
        assert!(find_field(doc.root_element(), ".missing").is_none());
        assert_eq!(field_text(doc.root_element(), "#nope"), None);
    }

    #[test]
    fn test_invalid_selector_is_absence() {
        let doc = Html::parse_document(HTML);
        assert!(find_field(doc.root_element(), "div[[").is_none());
        assert!(find_all(doc.root_element(), "div[[").is_empty());
    }

    #[test]
    fn test_find_nth() {
        let doc = Html::parse_document(HTML);
        let second = find_nth(doc.root_element(), ".card p", 1).map(text_of);
        assert_eq!(second, Some("Second".to_string()));
        assert!(find_nth(doc.root_element(), ".card p", 2).is_none());
    }

    #[test]
    fn test_attr_trimmed_and_blank_is_absent() {
        let doc = Html::parse_document(HTML);
        let imgs = find_all(doc.root_element(), ".card img");
        assert_eq!(imgs.len(), 2);
        assert_eq!(attr_of(imgs[0], "src"), Some("/a.png".to_string()));
        assert_eq!(attr_of(imgs[1], "src"), None);
        assert_eq!(attr_of(imgs[0], "alt"), None);
    }
}
