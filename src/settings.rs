//! Layered settings: built-in defaults, an optional file, then
//! `SITEMAPPER_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::crawler::config::{CrawlerConfig, DEFAULT_LIMIT, DEFAULT_PAGE_TIMEOUT, DEFAULT_WAIT_MS};
use crate::render::config::{DEFAULT_VIEWPORT, DEFAULT_WEBDRIVER_URL};

pub const ENV_PREFIX: &str = "SITEMAPPER";

/// Settings as read from files and the environment
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Milliseconds to wait after network idle
    pub wait_ms: u64,

    /// Maximum number of URLs to visit
    pub limit: usize,

    /// Seconds allowed for a single page
    pub page_timeout_secs: u64,

    pub output: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Directory for log files; logs go to stderr when unset
    pub log_dir: Option<String>,
}

impl Settings {
    /// Loads settings, reading `path` if given
    ///
    /// A missing file named explicitly is an error. Environment variables
    /// such as `SITEMAPPER_WAIT_MS=500` override file values.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("wait_ms", DEFAULT_WAIT_MS as i64)?
            .set_default("limit", DEFAULT_LIMIT as i64)?
            .set_default("page_timeout_secs", DEFAULT_PAGE_TIMEOUT as i64)?
            .set_default("output", "sitemap.xml")?
            .set_default("webdriver_url", DEFAULT_WEBDRIVER_URL)?
            .set_default("headless", true)?
            .set_default("viewport_width", DEFAULT_VIEWPORT.0 as i64)?
            .set_default("viewport_height", DEFAULT_VIEWPORT.1 as i64)?;

        if let Some(path) = path {
            debug!("Reading settings from {}", path);
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to assemble settings")?
            .try_deserialize::<Settings>()
            .context("Invalid settings")?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::new()
            .with_wait(Duration::from_millis(self.wait_ms))
            .with_limit(self.limit)
            .with_page_timeout(Duration::from_secs(self.page_timeout_secs))
            .with_webdriver_url(self.webdriver_url.clone())
            .with_headless(self.headless)
            .with_viewport_size(self.viewport_width, self.viewport_height)
    }
}
