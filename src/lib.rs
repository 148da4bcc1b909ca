//! Generates a sitemap for a website by rendering its pages in a real
//! browser and following every same-site link.

pub mod cli;
pub mod crawler;
pub mod error;
pub mod frontier;
pub mod render;
pub mod settings;
pub mod sitemap;
pub mod url_classifier;
pub mod utils;

pub use crawler::{run_crawl, CrawlReport, CrawlerConfig, SessionState, Sitemapper};
pub use error::{CrawlFailure, CrawlerError, RenderError};
pub use frontier::Frontier;
pub use render::{RenderEngine, RenderPage, RenderSession, WebDriverEngine};
pub use sitemap::SitemapDocument;
pub use url_classifier::RawLink;
