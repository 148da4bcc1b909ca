//! In-page scripts and decoding of their results.

use serde_json::Value;
use tracing::trace;

use crate::url_classifier::RawLink;

/// Returns one entry per `a` / `link[rel='alternate']` element.
///
/// HTML elements yield their resolved `href` string. SVG anchors expose
/// `href` as an `SVGAnimatedString`; for those the script hands back
/// `{ "svg": baseVal, "resolved": url }`, where `url` is `baseVal` resolved
/// against `document.baseURI` (so redirects and `<base href>` apply), or
/// `null` when the browser cannot resolve it.
pub const LINK_EXTRACTOR_SCRIPT: &str = r#"
return Array.from(document.querySelectorAll("a,link[rel='alternate']")).map(function (el) {
    var href = el.href;
    if (href && typeof href === 'object' && 'baseVal' in href) {
        var resolved = null;
        try {
            resolved = new URL(href.baseVal, document.baseURI).href;
        } catch (e) {}
        return { svg: href.baseVal, resolved: resolved };
    }
    return typeof href === 'string' ? href : null;
});
"#;

/// Number of resources the page has requested so far.
pub const RESOURCE_COUNT_SCRIPT: &str = r#"
return window.performance && performance.getEntriesByType
    ? performance.getEntriesByType('resource').length
    : 0;
"#;

/// Decodes the value returned by [`LINK_EXTRACTOR_SCRIPT`]
///
/// Elements without a usable target come back as `null` and are skipped.
/// SVG entries the browser already resolved become plain hrefs; the rest
/// keep their raw `baseVal` and are resolved against the page URL later.
/// Anything other than an array is an error.
pub fn decode_links(value: Value) -> Result<Vec<RawLink>, String> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(format!("expected an array of links, got {}", other)),
    };

    let mut links = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(href) => links.push(RawLink::Href(href)),
            Value::Object(mut map) => match (map.remove("resolved"), map.remove("svg")) {
                (Some(Value::String(resolved)), _) if !resolved.is_empty() => links.push(RawLink::Href(resolved)),
                (_, Some(Value::String(base_val))) => links.push(RawLink::SvgBaseVal(base_val)),
                (_, other) => trace!("Skipping SVG link without baseVal: {:?}", other),
            },
            Value::Null => {}
            other => trace!("Skipping unexpected link value: {}", other),
        }
    }
    Ok(links)
}
