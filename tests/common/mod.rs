//! Scripted stand-in for the browser, shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitemapper::{RawLink, RenderEngine, RenderError, RenderPage, RenderSession};

/// What a URL does when rendered
#[derive(Debug, Clone)]
pub enum PageScript {
    Links(Vec<RawLink>),
    NavigationError(String),
    EvaluationError(String),
    Hang,
}

/// Counters observed by tests
#[derive(Debug, Default)]
pub struct Stats {
    pub launches: AtomicUsize,
    pub session_closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub open_pages: AtomicUsize,
    pub max_open_pages: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
}

impl Stats {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    site: Arc<HashMap<String, PageScript>>,
    fail_launch: bool,
    pub stats: Arc<Stats>,
}

impl FakeEngine {
    pub fn new(site: HashMap<String, PageScript>) -> Self {
        Self {
            site: Arc::new(site),
            fail_launch: false,
            stats: Arc::new(Stats::default()),
        }
    }

    pub fn failing_launch() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }
}

/// A page whose only content is plain href links
pub fn page(url: &str, links: &[&str]) -> (String, PageScript) {
    let links = links.iter().map(|l| RawLink::Href(l.to_string())).collect();
    (url.to_string(), PageScript::Links(links))
}

pub fn site<I: IntoIterator<Item = (String, PageScript)>>(pages: I) -> HashMap<String, PageScript> {
    pages.into_iter().collect()
}

#[async_trait]
impl RenderEngine for FakeEngine {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, RenderError> {
        if self.fail_launch {
            return Err(RenderError::Launch("no browser available".to_string()));
        }
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            site: self.site.clone(),
            stats: self.stats.clone(),
            closed: false,
        })
    }
}

#[derive(Debug)]
pub struct FakeSession {
    site: Arc<HashMap<String, PageScript>>,
    stats: Arc<Stats>,
    closed: bool,
}

#[async_trait]
impl RenderSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage, RenderError> {
        self.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        let open = self.stats.open_pages.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_open_pages.fetch_max(open, Ordering::SeqCst);
        Ok(FakePage {
            site: self.site.clone(),
            stats: self.stats.clone(),
            script: None,
            closed: false,
        })
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if !self.closed {
            self.closed = true;
            self.stats.session_closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakePage {
    site: Arc<HashMap<String, PageScript>>,
    stats: Arc<Stats>,
    script: Option<PageScript>,
    closed: bool,
}

#[async_trait]
impl RenderPage for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), RenderError> {
        self.stats.navigations.lock().unwrap().push(url.to_string());
        let script = self.site.get(url).cloned().unwrap_or(PageScript::Links(Vec::new()));
        match &script {
            PageScript::NavigationError(reason) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    reason: reason.clone(),
                })
            }
            PageScript::Hang => tokio::time::sleep(Duration::from_secs(3600)).await,
            _ => {}
        }
        self.script = Some(script);
        Ok(())
    }

    async fn extract_links(&mut self) -> Result<Vec<RawLink>, RenderError> {
        match self.script.take() {
            Some(PageScript::Links(links)) => Ok(links),
            Some(PageScript::EvaluationError(reason)) => Err(RenderError::Evaluation {
                url: "fake".to_string(),
                reason,
            }),
            _ => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if !self.closed {
            self.closed = true;
            self.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
            self.stats.open_pages.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
