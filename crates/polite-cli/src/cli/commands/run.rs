//! `polite run` – fetch pages politely.

use anyhow::Result;
use polite_core::cache::JsonFileCache;
use polite_core::clock::SystemClock;
use polite_core::config::PoliteConfig;
use polite_core::policy::{CrawlReport, ListPolicy};
use polite_core::renderer::CurlRenderer;
use polite_core::{PoliteEngine, RunSummary};
use std::path::PathBuf;

/// Arguments of `polite run`.
#[derive(Debug, Default)]
pub struct FetchArgs {
    pub urls: Vec<String>,
    pub file: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub no_cache: bool,
}

pub async fn run_fetch(cfg: &PoliteConfig, args: FetchArgs) -> Result<()> {
    let mut urls = args.urls;
    if let Some(path) = &args.file {
        urls.extend(ListPolicy::urls_from_file(path)?);
    }
    if urls.is_empty() {
        println!("No URLs to fetch.");
        return Ok(());
    }

    let engine_cfg = cfg.engine_config()?;
    let mut policy = ListPolicy::new(urls, cfg.markers.clone());
    if let Some(dir) = args.out_dir {
        policy = policy.with_out_dir(dir);
    }
    let stop = policy.stop_handle();

    let clock = SystemClock::new();
    let interrupter = clock.interrupter();

    let mut builder = PoliteEngine::builder(CurlRenderer::new(cfg.curl_options()), policy)
        .clock(clock)
        .config(engine_cfg);
    if let Some(seed) = args.seed.or(cfg.engine.seed) {
        builder = builder.seed(seed);
    }
    if cfg.cache.enabled && !args.no_cache {
        let path = match &cfg.cache.path {
            Some(p) => p.clone(),
            None => JsonFileCache::default_path()?,
        };
        builder = builder.cache(JsonFileCache::open_or_empty(&path)?);
    }
    let mut engine = builder.build()?;

    let mut worker = tokio::task::spawn_blocking(move || {
        let summary = engine.run();
        let (_, policy) = engine.into_parts();
        (summary, policy.into_report())
    });

    // Ctrl-C: hand out no more URLs and cut the current sleep short; the
    // URL in flight is reported as interrupted.
    let (summary, report) = tokio::select! {
        joined = &mut worker => joined?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Stopping: finishing the current URL...");
            stop.stop();
            interrupter.interrupt();
            worker.await?
        }
    };

    print_summary(&summary, &report);
    Ok(())
}

fn print_summary(summary: &RunSummary, report: &CrawlReport) {
    println!(
        "{} URL(s): {} fetched, {} from cache, {} failed, {} backoff(s)",
        summary.urls, summary.fetched, summary.from_cache, summary.failed, summary.backoffs
    );
    for (url, saved) in &report.done {
        if let Some(path) = saved {
            println!("  saved  {} -> {}", url, path.display());
        }
    }
    for (url, message) in &report.failed {
        println!("  failed {}: {}", url, message);
    }
}
