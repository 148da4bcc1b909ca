use clap::Parser;

/// Generates a sitemap.xml file by crawling a website
#[derive(Parser, Debug)]
#[command(
    name = "sitemapper",
    version,
    about = "Generates a sitemap.xml file by crawling a website",
    after_help = "Example:\n  $ sitemapper --wait 2500 https://example.com\n  $ sitemapper -w 1000 -l 100 -o my-sitemap.xml https://mysite.com"
)]
pub struct Args {
    /// URL to start crawling from
    pub url: Option<String>,

    /// Time to wait before parsing the page (for CSR pages), in milliseconds
    #[arg(short, long, value_name = "MILLISECONDS")]
    pub wait: Option<u64>,

    /// Maximum number of URLs to parse
    #[arg(short, long, value_name = "NUMBER")]
    pub limit: Option<usize>,

    /// Output file path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// WebDriver server to drive the browser through
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Seconds allowed for rendering a single page
    #[arg(long, value_name = "SECONDS")]
    pub page_timeout: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Write logs to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,
}

impl Args {
    /// Applies flags that were given explicitly on top of loaded settings
    pub fn apply(&self, settings: &mut crate::settings::Settings) {
        if let Some(wait) = self.wait {
            settings.wait_ms = wait;
        }
        if let Some(limit) = self.limit {
            settings.limit = limit;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(url) = &self.webdriver_url {
            settings.webdriver_url = url.clone();
        }
        if let Some(timeout) = self.page_timeout {
            settings.page_timeout_secs = timeout;
        }
        if self.headed {
            settings.headless = false;
        }
        if let Some(dir) = &self.log_dir {
            settings.log_dir = Some(dir.clone());
        }
    }
}
