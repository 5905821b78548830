// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    describe_outcome, load_edges_from_file, parse_selection, parse_triple_line, resolve_token,
};

// Re-export crawl functionality from follownet-core
pub use follownet_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
