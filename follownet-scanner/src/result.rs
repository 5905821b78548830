use crate::model::{EdgeSet, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Users whose follower page was fetched successfully
    pub fetched: usize,
    /// Users whose fetch failed (status, network or body)
    pub failed: usize,
    /// Frontier entries skipped as already explored or too deep
    pub skipped: usize,
}

/// How a finished crawl should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// At least one edge was discovered
    Edges,
    /// The root was fetched but nothing was found
    Empty,
    /// The root's own fetch failed: bad credentials, unknown user, rate limit
    RootUnreachable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub root: UserId,
    pub edges: EdgeSet,
    pub root_reachable: bool,
    pub cancelled: bool,
    pub stats: CrawlStats,
    pub elapsed: Duration,
}

impl CrawlResult {
    pub fn new(root: UserId) -> Self {
        Self {
            root,
            edges: EdgeSet::new(),
            root_reachable: false,
            cancelled: false,
            stats: CrawlStats::default(),
            elapsed: Duration::from_secs(0),
        }
    }

    pub fn outcome(&self) -> CrawlOutcome {
        if !self.edges.is_empty() {
            CrawlOutcome::Edges
        } else if self.root_reachable {
            CrawlOutcome::Empty
        } else {
            CrawlOutcome::RootUnreachable
        }
    }
}
