//! Sitemap XML output (sitemaps.org protocol 0.9).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use tracing::debug;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const LASTMOD_FORMAT: &str = "%Y-%m-%d";

/// A sitemap under construction
///
/// Every entry shares the same `lastmod`, the date the crawl session was
/// created.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    lastmod: String,
    urls: Vec<String>,
}

impl SitemapDocument {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            lastmod: generated_on.format(LASTMOD_FORMAT).to_string(),
            urls: Vec::new(),
        }
    }

    pub fn add_url(&mut self, loc: impl Into<String>) {
        self.urls.push(loc.into());
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Serializes the document as pretty-printed XML
    pub fn to_xml(&self) -> Result<String> {
        debug!("Serializing sitemap with {} urls", self.urls.len());
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .context("Failed to write XML declaration")?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
        writer.write_event(Event::Start(urlset))
            .context("Failed to open urlset")?;

        for loc in &self.urls {
            writer.write_event(Event::Start(BytesStart::new("url")))?;
            write_text_element(&mut writer, "loc", loc)
                .with_context(|| format!("Failed to write loc for {}", loc))?;
            write_text_element(&mut writer, "lastmod", &self.lastmod)?;
            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))
            .context("Failed to close urlset")?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).context("Sitemap is not valid UTF-8")
    }
}

fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
