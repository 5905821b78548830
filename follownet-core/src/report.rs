// Report generation from crawl results

use crate::assemble::assemble;
use crate::derive::{derive_degrees, profile_url};
use crate::error::{CoreError, Result};
use follownet_scanner::{CrawlOutcome, CrawlResult, CrawlStats, EdgeSet, RELATION, UserId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
    /// The assembled, styled graph for a renderer
    Graph,
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "graph" | "vis" => Ok(ReportFormat::Graph),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub root: UserId,
    /// Unknown for edge lists loaded from a file
    pub depth: Option<usize>,
    pub max_followers: Option<usize>,
    pub status: String,
    pub stats: CrawlStats,
    /// Edges found by the crawl, before any selection
    pub total_edges: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected: Vec<UserId>,
    /// Edges shown in the report
    pub edges: EdgeSet,
}

impl ReportData {
    /// Narrow the crawl to edges touching `selected` (all edges if empty)
    pub fn from_crawl(
        result: &CrawlResult,
        depth: usize,
        max_followers: usize,
        selected: &[UserId],
    ) -> Self {
        Self {
            root: result.root.clone(),
            depth: Some(depth),
            max_followers: Some(max_followers),
            status: status_of(result).to_string(),
            stats: result.stats.clone(),
            total_edges: result.edges.len(),
            selected: selected.to_vec(),
            edges: result.edges.retain_touching(selected),
        }
    }

    /// Report over a saved edge list. Nothing is known about how it was crawled.
    pub fn from_saved(root: UserId, edges: &EdgeSet, selected: &[UserId]) -> Self {
        Self {
            root,
            depth: None,
            max_followers: None,
            status: "saved".to_string(),
            stats: CrawlStats::default(),
            total_edges: edges.len(),
            selected: selected.to_vec(),
            edges: edges.retain_touching(selected),
        }
    }

    pub fn node_count(&self) -> usize {
        self.edges.nodes().len()
    }
}

fn status_of(result: &CrawlResult) -> &'static str {
    if result.cancelled {
        return "cancelled";
    }
    match result.outcome() {
        CrawlOutcome::Edges => "completed",
        CrawlOutcome::Empty => "empty",
        CrawlOutcome::RootUnreachable => "root_unreachable",
    }
}

pub fn render_report(format: ReportFormat, data: &ReportData) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => Ok(generate_json_report(data)?),
        ReportFormat::Csv => Ok(generate_csv_report(&data.edges)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
        ReportFormat::Graph => Ok(assemble(&data.edges).to_json()?),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                  FOLLOWER NETWORK REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Root:           {}\n", data.root));
    report.push_str(&format!("Status:         {}\n", format_status(&data.status)));
    if let (Some(depth), Some(max_followers)) = (data.depth, data.max_followers) {
        report.push_str(&format!("Depth:          {}\n", depth));
        report.push_str(&format!("Max followers:  {}\n", max_followers));
        report.push_str(&format!(
            "Fetched:        {} users ({} failed)\n",
            data.stats.fetched, data.stats.failed
        ));
    }
    if data.selected.is_empty() {
        report.push_str(&format!("Edges:          {}\n", data.edges.len()));
    } else {
        let names: Vec<&str> = data.selected.iter().map(UserId::as_str).collect();
        report.push_str(&format!("Selected:       {}\n", names.join(", ")));
        report.push_str(&format!(
            "Edges:          {} of {}\n",
            data.edges.len(),
            data.total_edges
        ));
    }
    report.push_str(&format!("Users:          {}\n\n", data.node_count()));

    if !data.edges.is_empty() {
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("MOST CONNECTED\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        let mut degrees: Vec<(UserId, usize)> = derive_degrees(&data.edges).into_iter().collect();
        degrees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (user, degree) in degrees.iter().take(10) {
            report.push_str(&format!("  {:<24} {}\n", user.as_str(), degree));
        }
        report.push('\n');

        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("CONNECTIONS\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        for (idx, edge) in data.edges.iter().enumerate() {
            report.push_str(&format!(
                "{:>4}. {} --{}--> {}\n",
                idx + 1,
                edge.follower,
                RELATION,
                edge.followee
            ));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(data: &ReportData) -> std::result::Result<String, serde_json::Error> {
    let triples: Vec<[&str; 3]> = data
        .edges
        .triples()
        .into_iter()
        .map(|(a, rel, b)| [a, rel, b])
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "follownet",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "root": data.root,
                "depth": data.depth,
                "max_followers": data.max_followers,
                "status": data.status,
                "fetched": data.stats.fetched,
                "failed": data.stats.failed,
                "skipped": data.stats.skipped
            },
            "summary": {
                "total_edges": data.total_edges,
                "shown_edges": data.edges.len(),
                "users": data.node_count(),
                "selected": data.selected
            },
            "triples": triples
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(edges: &EdgeSet) -> String {
    let mut csv = String::from("follower,relation,followee\n");
    for (follower, relation, followee) in edges.triples() {
        csv.push_str(&format!(
            "{},{},{}\n",
            escape_csv(follower),
            relation,
            escape_csv(followee)
        ));
    }
    csv
}

/// Numbered list of links to both profiles
pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Follower network of {}\n\n", data.root));
    match (data.depth, data.max_followers) {
        (Some(depth), Some(max_followers)) => md.push_str(&format!(
            "Depth {}, up to {} followers per user, {} connections.\n\n",
            depth,
            max_followers,
            data.edges.len()
        )),
        _ => md.push_str(&format!("{} connections.\n\n", data.edges.len())),
    }
    md.push_str("## Network Connections List\n\n");

    for (idx, edge) in data.edges.iter().enumerate() {
        md.push_str(&format!(
            "{}. [{}]({}) `--{}-->` [{}]({})\n",
            idx + 1,
            edge.follower,
            profile_url(&edge.follower),
            RELATION,
            edge.followee,
            profile_url(&edge.followee)
        ));
    }

    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_status(status: &str) -> &str {
    match status {
        "completed" => "Completed",
        "empty" => "Completed (no followers found)",
        "root_unreachable" => "Root user could not be fetched",
        "cancelled" => "Cancelled (partial results)",
        "saved" => "Loaded from file",
        _ => "Unknown",
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
