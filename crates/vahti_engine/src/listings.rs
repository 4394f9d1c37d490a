use std::collections::BTreeSet;

use scraper::{Html, Selector};
use url::Url;

/// Extracts canonical listing detail URLs from a page.
///
/// An anchor counts as a listing when its resolved URL path starts with
/// `detail_prefix`, has at least one real segment after the prefix, and
/// carries no query string. Query-bearing links are list or search views of
/// the same inventory, not listings. Canonical form drops any trailing slash
/// so the same listing never appears under two spellings.
pub fn extract_listings(html: &str, base_url: &Url, detail_prefix: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let anchor = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return BTreeSet::new(),
    };

    let mut listings = BTreeSet::new();
    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_url(href, base_url) else {
            continue;
        };
        if let Some(canonical) = canonicalize_listing(&resolved, detail_prefix) {
            listings.insert(canonical);
        }
    }
    listings
}

fn canonicalize_listing(url: &Url, detail_prefix: &str) -> Option<String> {
    if url.query().is_some() {
        return None;
    }
    let tail = url.path().strip_prefix(detail_prefix)?;
    if tail.trim_matches('/').is_empty() {
        return None;
    }
    Some(url.as_str().trim_end_matches('/').to_string())
}

/// Resolves an href against the page URL, discarding fragments-only,
/// query-only, and scripting pseudo-links.
fn resolve_url(href: &str, base: &Url) -> Option<Url> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(absolute) = Url::parse(trimmed) {
        return Some(absolute);
    }
    base.join(trimmed).ok()
}
