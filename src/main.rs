use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use sitemapper::cli::Args;
use sitemapper::crawler::runner::ERROR_SUMMARY_LIMIT;
use sitemapper::settings::Settings;
use sitemapper::utils::logger::init_logger;
use sitemapper::{run_crawl, Sitemapper, WebDriverEngine};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let url = match args.url.clone() {
        Some(url) => url,
        None => {
            eprintln!("Error: URL argument is required");
            println!("Run \"sitemapper --help\" for usage information");
            return ExitCode::from(1);
        }
    };

    match run(&args, &url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n✗ Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: &Args, url: &str) -> Result<()> {
    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    init_logger(settings.log_dir.as_deref())?;

    let config = settings.crawler_config();
    println!("Starting sitemap generation for: {}", url);
    println!("Wait time: {}ms | Limit: {} URLs\n", config.wait.as_millis(), config.limit);

    let engine = WebDriverEngine::from_config(&config);
    let mut mapper = Sitemapper::new(engine, url, config);
    let report = run_crawl(&mut mapper).await?;

    println!("\nWriting {}...", settings.output);
    fs::write(&settings.output, &report.xml)
        .with_context(|| format!("Failed to write sitemap to {}", settings.output))?;

    let output = fs::canonicalize(Path::new(&settings.output))
        .unwrap_or_else(|_| Path::new(&settings.output).to_path_buf());
    println!("\n✓ Sitemap generated successfully!");
    println!("  - URLs parsed: {}", report.visited.len());
    println!("  - Output file: {}", output.display());

    if !report.errors.is_empty() {
        println!("\n⚠ Encountered {} error(s) during parsing:", report.errors.len());
        let (shown, remaining) = report.error_summary(ERROR_SUMMARY_LIMIT);
        for message in shown {
            println!("  - {}", message);
        }
        if remaining > 0 {
            println!("  ... and {} more", remaining);
        }
    }

    Ok(())
}
