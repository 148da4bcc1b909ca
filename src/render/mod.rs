//! Narrow interface to the browser that renders pages for the crawler.
//!
//! The crawler only needs to launch a session, open one page at a time,
//! navigate it, pull the link targets out of the rendered document and
//! close everything again. `webdriver` implements this against a WebDriver
//! server; tests substitute a scripted fake.

use async_trait::async_trait;

use crate::error::RenderError;
use crate::url_classifier::RawLink;

pub mod client;
pub mod config;
pub mod extract;
pub mod webdriver;

pub use webdriver::{WebDriverEngine, WebDriverPage, WebDriverSession};

/// Starts browser sessions
#[async_trait]
pub trait RenderEngine: Send + Sync {
    type Session: RenderSession;

    /// Acquires the session-wide browser resource
    async fn launch(&self) -> Result<Self::Session, RenderError>;
}

/// A running browser owned by one crawl session
#[async_trait]
pub trait RenderSession: Send + Sync {
    type Page: RenderPage;

    /// Opens a fresh page. At most one is open at any time.
    async fn new_page(&self) -> Result<Self::Page, RenderError>;

    /// Shuts the browser down. Calling it again must not fail.
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// A single page resource
#[async_trait]
pub trait RenderPage: Send {
    /// Navigates to `url` and returns once the network has gone quiet
    async fn goto(&mut self, url: &str) -> Result<(), RenderError>;

    /// Collects the targets of every `a` and `link[rel='alternate']` element
    async fn extract_links(&mut self) -> Result<Vec<RawLink>, RenderError>;

    /// Releases the page
    async fn close(&mut self) -> Result<(), RenderError>;
}
