use crate::model::{Edge, EdgeSet, UserId};
use crate::result::CrawlResult;
use crate::source::FollowerSource;
use futures::stream::{self, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Called with `(depth, login)` right before a user's followers are fetched
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Depth-limited crawl of the follower graph starting from one root user.
///
/// The frontier is a FIFO queue of `(user, depth)`. Followers are enqueued
/// unconditionally, so a user may sit in the frontier several times before
/// its first expansion; the duplicates are skipped when popped. Each user is
/// claimed before its fetch is issued, which means it is fetched at most once
/// per crawl even when the fetch fails.
///
/// Fetches for one depth level run with up to `workers` requests in flight.
/// Results are consumed in claim order, so the discovered edges do not
/// depend on the worker count.
pub struct Crawler<S> {
    source: S,
    max_depth: usize,
    max_followers: usize,
    workers: usize,
    cancel: CancellationToken,
    progress_callback: Option<ProgressCallback>,
}

impl<S: FollowerSource> Crawler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_depth: 2,
            max_followers: 5,
            workers: 1,
            cancel: CancellationToken::new(),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_followers(mut self, max_followers: usize) -> Self {
        if max_followers == 0 {
            warn!("max followers per user must be at least 1, using 1");
        }
        self.max_followers = max_followers.max(1);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, root: impl Into<UserId>) -> CrawlResult {
        let start = Instant::now();
        let root = root.into();
        info!(
            "Starting crawl of {} (depth {}, {} followers per user, {} workers)",
            root, self.max_depth, self.max_followers, self.workers
        );

        let mut result = CrawlResult::new(root.clone());
        let mut frontier: VecDeque<(UserId, usize)> = VecDeque::from([(root, 0)]);
        let mut explored: HashSet<UserId> = HashSet::new();

        'crawl: while let Some(level) = frontier.front().map(|(_, depth)| *depth) {
            // Every entry left in the frontier belongs to `level`: the next
            // level is only enqueued once this one has been claimed.
            let mut batch = Vec::new();
            while let Some((user, depth)) = frontier.pop_front() {
                if self.cancel.is_cancelled() {
                    result.cancelled = true;
                    break 'crawl;
                }
                if depth > self.max_depth || !explored.insert(user.clone()) {
                    result.stats.skipped += 1;
                    continue;
                }
                batch.push(user);
            }

            if batch.is_empty() {
                continue;
            }
            debug!("Expanding {} users at depth {}", batch.len(), level);

            let source = &self.source;
            let progress = self.progress_callback.as_ref();
            let per_page = self.max_followers;
            let mut pages = stream::iter(batch.into_iter().map(move |user| async move {
                if let Some(callback) = progress {
                    callback(level, user.to_string());
                }
                let page = source.fetch_followers(&user, per_page).await;
                (user, page)
            }))
            .buffered(self.workers);

            loop {
                let next = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        result.cancelled = true;
                        break 'crawl;
                    }
                    next = pages.next() => next,
                };
                let Some((user, page)) = next else {
                    break;
                };

                match page {
                    Ok(followers) => {
                        result.stats.fetched += 1;
                        if level == 0 {
                            result.root_reachable = true;
                        }
                        for follower in followers.into_iter().take(self.max_followers) {
                            result.edges.insert(Edge::new(follower.clone(), user.clone()));
                            frontier.push_back((follower, level + 1));
                        }
                    }
                    Err(e) => {
                        result.stats.failed += 1;
                        warn!("Skipping {}: {}", user, e);
                    }
                }
            }
        }

        result.elapsed = start.elapsed();
        if result.cancelled {
            info!(
                "Crawl cancelled after {} fetches, keeping {} edges",
                result.stats.fetched,
                result.edges.len()
            );
        } else {
            info!(
                "Crawl complete. {} edges from {} fetches ({} failed)",
                result.edges.len(),
                result.stats.fetched,
                result.stats.failed
            );
        }
        result
    }
}

/// Sequential crawl returning only the discovered edges
pub async fn crawl_followers<S: FollowerSource>(
    root: impl Into<UserId>,
    max_depth: usize,
    max_followers: usize,
    source: S,
) -> EdgeSet {
    Crawler::new(source)
        .with_max_depth(max_depth)
        .with_max_followers(max_followers)
        .crawl(root)
        .await
        .edges
}
