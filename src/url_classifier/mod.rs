use tracing::trace;
use url::Url;


/// A link value harvested from a rendered page, before resolution
///
/// Plain anchors and `<link>` elements expose their `href` as a string the
/// browser has already made absolute. SVG anchors expose an animated
/// string whose `baseVal` is the attribute text as written, so it may
/// still be relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLink {
    Href(String),
    SvgBaseVal(String),
}

/// Checks whether `url` belongs to the site rooted at `seed`
///
/// This is a literal, case-sensitive string prefix test. It does not parse
/// the authority, so a seed of `https://example.com` also accepts
/// `https://example.com.evil.com`.
pub fn is_in_scope(url: &str, seed: &str) -> bool {
    url.starts_with(seed)
}

/// Checks whether `url` carries a fragment marker anywhere
///
/// Such links point into a document rather than at a new page and are
/// never queued.
pub fn is_anchor_only(url: &str) -> bool {
    url.contains('#')
}

/// Returns the deduplication form of `url`
///
/// Strips one trailing `/` and nothing else. Query strings and case are
/// left alone.
pub fn normalize(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// Resolves a harvested link value into an absolute URL string
///
/// # Arguments
/// * `raw` - The value returned by the in-page extractor
/// * `page_url` - URL of the page the value was harvested from
///
/// # Returns
/// * `Option<String>` - The absolute URL, or `None` for empty or unresolvable values
pub fn resolve_link(raw: &RawLink, page_url: &str) -> Option<String> {
    let value = match raw {
        RawLink::Href(href) => {
            let href = href.trim();
            if href.is_empty() {
                return None;
            }
            if Url::parse(href).is_ok() {
                return Some(href.to_string());
            }
            href
        }
        RawLink::SvgBaseVal(base_val) => base_val.trim(),
    };

    if value.is_empty() {
        return None;
    }

    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            trace!("Cannot resolve {:?} against unparseable page URL {}: {}", value, page_url, e);
            return None;
        }
    };

    match base.join(value) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            trace!("Dropping link {:?} found on {}: {}", value, page_url, e);
            None
        }
    }
}
