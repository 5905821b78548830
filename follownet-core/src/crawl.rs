use crate::cache::{CrawlCache, CrawlKey};
use crate::error::Result;
use follownet_scanner::source::DEFAULT_API_BASE;
use follownet_scanner::{CrawlResult, Crawler, GithubFollowers, UserId};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub root: UserId,
    pub depth: usize,
    pub max_followers: usize,
    pub token: String,
    pub threads: usize,
    pub api_base: String,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(root: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            depth: 2,
            max_followers: 5,
            token: token.into(),
            threads: 4,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 10,
            show_progress_bars: false,
        }
    }

    pub fn cache_key(&self) -> CrawlKey {
        CrawlKey {
            root: self.root.clone(),
            depth: self.depth,
            token: self.token.clone(),
            max_followers: self.max_followers,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a crawl with the given options, answering from `cache` when the
/// same crawl has already completed.
pub async fn execute_crawl(
    options: CrawlOptions,
    cache: Option<&CrawlCache>,
    cancel: CancellationToken,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult> {
    let key = options.cache_key();
    if let Some(hit) = cache.and_then(|c| c.get(&key)) {
        info!("Serving crawl of {} from cache", options.root);
        return Ok(hit);
    }

    let CrawlOptions {
        root,
        depth,
        max_followers,
        token,
        threads,
        api_base,
        timeout_secs,
        show_progress_bars,
    } = options;

    let source = GithubFollowers::with_api_base(token, &api_base, timeout_secs)?;

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching followers of {}...", root));
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetched_count = Arc::new(AtomicUsize::new(0));
    let count_clone = fetched_count.clone();
    let pb_clone = progress_bar.clone();
    let user_callback = progress_callback;
    let crawler = Crawler::new(source)
        .with_max_depth(depth)
        .with_max_followers(max_followers)
        .with_workers(threads)
        .with_cancellation(cancel)
        .with_progress_callback(Arc::new(move |level: usize, login: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Depth {} | {} users fetched | {}", level, count, login));
            }
            if let Some(ref callback) = user_callback {
                callback(format!("[depth {}] {}", level, login));
            }
        }));

    let result = crawler.crawl(root).await;

    if let Some(ref pb) = progress_bar {
        let total = fetched_count.load(Ordering::Relaxed);
        let message = if result.cancelled {
            format!("Crawl cancelled after {} users, {} edges kept", total, result.edges.len())
        } else {
            format!("Crawl complete! {} users fetched, {} edges", total, result.edges.len())
        };
        pb.finish_with_message(message);
    }

    if let Some(cache) = cache {
        cache.insert(key, result.clone());
    }

    Ok(result)
}
