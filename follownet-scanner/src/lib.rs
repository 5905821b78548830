pub mod crawler;
pub mod error;
pub mod model;
pub mod result;
pub mod source;

pub use crawler::{Crawler, ProgressCallback, crawl_followers};
pub use error::ScanError;
pub use model::{Edge, EdgeSet, RELATION, UserId};
pub use result::{CrawlOutcome, CrawlResult, CrawlStats};
pub use source::{FollowerSource, GithubFollowers};
