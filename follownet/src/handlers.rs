use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use follownet_core::crawl::{CrawlOptions, execute_crawl};
use follownet_core::report::{ReportData, ReportFormat, render_report, save_report};
use follownet_scanner::{CrawlOutcome, CrawlResult, Edge, EdgeSet, RELATION, UserId};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Helper functions for crawl and render handlers

/// Logs go to stderr so reports can be piped. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Pick the API token: a token file wins over `--token`/`GITHUB_TOKEN`.
/// No token at all means unauthenticated requests.
pub fn resolve_token(token: Option<&String>, token_file: Option<&String>) -> Result<String, String> {
    if let Some(token_file) = token_file {
        let expanded = shellexpand::tilde(token_file);
        let path = Path::new(expanded.as_ref());
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read token file {}: {}", path.display(), e))?;
        let token = content.trim();
        if token.is_empty() {
            return Err(format!("Token file {} is empty", path.display()));
        }
        return Ok(token.to_string());
    }

    Ok(token.map(|t| t.trim().to_string()).unwrap_or_default())
}

/// Collect `--select` values, dropping blanks and repeats but keeping order
pub fn parse_selection<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<UserId> {
    let mut selected: Vec<UserId> = Vec::new();
    for value in values {
        let login = value.trim();
        if login.is_empty() {
            continue;
        }
        let user = UserId::from(login);
        if !selected.contains(&user) {
            selected.push(user);
        }
    }
    selected
}

/// Parse one `follower,relation,followee` row. The header row, blank lines
/// and rows with another relation are skipped.
pub fn parse_triple_line(line: &str) -> Option<Edge> {
    let fields: Vec<String> = split_csv_line(line);
    match fields.as_slice() {
        [follower, relation, followee]
            if relation == RELATION && !follower.is_empty() && !followee.is_empty() =>
        {
            Some(Edge::new(follower.as_str(), followee.as_str()))
        }
        _ => None,
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Load a saved follower list written by `--format csv`
pub fn load_edges_from_file(path: &PathBuf) -> Result<EdgeSet, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let edges: EdgeSet = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_triple_line)
        .collect();

    if edges.is_empty() {
        return Err(format!("No follower rows found in {}", path.display()));
    }

    Ok(edges)
}

fn write_report(content: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            save_report(content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn report_format(args: &ArgMatches) -> anyhow::Result<ReportFormat> {
    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    Ok(ReportFormat::from_str(format)?)
}

fn selection(args: &ArgMatches) -> Vec<UserId> {
    args.get_many::<String>("select")
        .map(parse_selection)
        .unwrap_or_default()
}

pub fn describe_outcome(result: &CrawlResult) -> String {
    if result.cancelled {
        return format!(
            "Crawl interrupted, keeping {} connections found so far",
            result.edges.len()
        );
    }
    match result.outcome() {
        CrawlOutcome::Edges => format!(
            "Found {} connections between {} users",
            result.edges.len(),
            result.edges.nodes().len()
        ),
        CrawlOutcome::Empty => format!("{} has no followers", result.root),
        CrawlOutcome::RootUnreachable => format!(
            "Could not fetch followers of {}. Check the username and API token",
            result.root
        ),
    }
}

/// The user with the highest degree stands in for the root of a saved list.
/// Ties go to the alphabetically first login.
pub fn saved_root(edges: &EdgeSet) -> UserId {
    follownet_core::derive_degrees(edges)
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(user, _)| user)
        .unwrap_or_else(|| UserId::from("unknown"))
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    init_tracing();

    let root = args
        .get_one::<String>("user")
        .map(|u| u.trim().to_string())
        .unwrap_or_default();
    if root.is_empty() {
        bail!("A GitHub username is required");
    }
    let depth = *args.get_one::<u64>("depth").unwrap_or(&2) as usize;
    let max_followers = *args.get_one::<u64>("max-followers").unwrap_or(&5) as usize;
    let threads = *args.get_one::<usize>("threads").unwrap_or(&4);
    let timeout_secs = *args.get_one::<u64>("timeout").unwrap_or(&10);
    let api_base = args
        .get_one::<String>("api-base")
        .cloned()
        .unwrap_or_else(|| "https://api.github.com".to_string());
    let token = resolve_token(args.get_one::<String>("token"), args.get_one::<String>("token-file"))
        .map_err(anyhow::Error::msg)?;
    let format = report_format(args)?;
    let selected = selection(args);
    debug!("Selection: {:?}", selected);

    if !quiet {
        eprintln!("\n🕸️  Crawling followers of {}", root.bright_white().bold());
        eprintln!("Depth: {}", depth);
        eprintln!("Max followers per user: {}", max_followers);
        eprintln!("Workers: {}", threads);
        if token.is_empty() {
            eprintln!("{}", "No API token: requests are unauthenticated".yellow());
        }
        eprintln!();
    }

    let options = CrawlOptions {
        root: UserId::from(root),
        depth,
        max_followers,
        token,
        threads,
        api_base,
        timeout_secs,
        show_progress_bars: !quiet,
    };

    // Ctrl-C stops the crawl and keeps what was found
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let result = execute_crawl(options, None, cancel, None).await?;

    let summary = describe_outcome(&result);
    match (result.cancelled, result.outcome()) {
        (false, CrawlOutcome::RootUnreachable) => bail!(summary),
        (true, _) => eprintln!("{} {}", "⚠".yellow().bold(), summary),
        _ => {
            if !quiet {
                eprintln!("{} {}\n", "✓".green().bold(), summary);
            }
        }
    }

    let data = ReportData::from_crawl(&result, depth, max_followers, &selected);
    if data.edges.is_empty() && !selected.is_empty() {
        eprintln!("{} No connections touch the selected users", "⚠".yellow().bold());
    }

    let report = render_report(format, &data)?;
    write_report(&report, args.get_one::<PathBuf>("output"))
}

pub fn handle_render(args: &ArgMatches) -> anyhow::Result<()> {
    init_tracing();

    let input = args
        .get_one::<PathBuf>("input")
        .context("--input is required")?;
    let edges = load_edges_from_file(input).map_err(anyhow::Error::msg)?;
    debug!("Loaded {} follower rows from {}", edges.len(), input.display());
    let format = report_format(args)?;
    let selected = selection(args);

    let data = ReportData::from_saved(saved_root(&edges), &edges, &selected);
    let report = render_report(format, &data)?;
    write_report(&report, args.get_one::<PathBuf>("output"))
}
