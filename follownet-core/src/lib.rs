pub mod assemble;
pub mod cache;
pub mod crawl;
pub mod derive;
pub mod error;
pub mod report;

pub use assemble::{RenderableGraph, assemble};
pub use cache::{CrawlCache, CrawlKey};
pub use crawl::{CrawlOptions, execute_crawl};
pub use derive::{derive_degrees, derive_node_styles, style_for_degree};
pub use error::CoreError;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   __       _ _                          _
  / _| ___ | | | _____      ___ __   ___| |_
 | |_ / _ \| | |/ _ \ \ /\ / / '_ \ / _ \ __|
 |  _| (_) | | | (_) \ V  V /| | | |  __/ |_
 |_|  \___/|_|_|\___/ \_/\_/ |_| |_|\___|\__|
"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "GitHub follower network crawler".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
