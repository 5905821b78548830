use follownet::handlers::*;
use follownet_scanner::{CrawlResult, Edge, EdgeSet, UserId};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_parse_triple_line() {
    assert_eq!(
        parse_triple_line("bob,follows,alice"),
        Some(Edge::new("bob", "alice"))
    );
}

#[test]
fn test_parse_triple_line_trims_whitespace() {
    assert_eq!(
        parse_triple_line("  bob,follows,alice  "),
        Some(Edge::new("bob", "alice"))
    );
}

#[test]
fn test_parse_triple_line_quoted_field() {
    assert_eq!(
        parse_triple_line("\"odd,name\",follows,alice"),
        Some(Edge::new("odd,name", "alice"))
    );
}

#[test]
fn test_parse_triple_line_rejects_other_rows() {
    assert_eq!(parse_triple_line("follower,relation,followee"), None);
    assert_eq!(parse_triple_line("bob,likes,alice"), None);
    assert_eq!(parse_triple_line("bob,follows"), None);
    assert_eq!(parse_triple_line(",follows,alice"), None);
    assert_eq!(parse_triple_line(""), None);
}

#[test]
fn test_load_edges_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "follower,relation,followee").unwrap();
    writeln!(temp_file, "bob,follows,alice").unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "carol,follows,alice").unwrap();
    writeln!(temp_file, "dave,follows,carol").unwrap();
    writeln!(temp_file, "bob,follows,alice").unwrap();
    temp_file.flush().unwrap();

    let edges = load_edges_from_file(&temp_file.path().to_path_buf()).unwrap();

    assert_eq!(edges.len(), 3);
    assert!(edges.contains(&Edge::new("dave", "carol")));
    assert_eq!(edges.nodes().len(), 4);
}

#[test]
fn test_load_edges_from_file_without_rows() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "follower,relation,followee").unwrap();
    temp_file.flush().unwrap();

    let result = load_edges_from_file(&temp_file.path().to_path_buf());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No follower rows"));
}

#[test]
fn test_load_edges_from_missing_file() {
    let result = load_edges_from_file(&PathBuf::from("/nonexistent/followers.csv"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read"));
}

#[test]
fn test_resolve_token_prefers_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "  file-token  ").unwrap();
    temp_file.flush().unwrap();

    let flag = "flag-token".to_string();
    let path = temp_file.path().to_string_lossy().to_string();
    assert_eq!(resolve_token(Some(&flag), Some(&path)).unwrap(), "file-token");
}

#[test]
fn test_resolve_token_from_flag() {
    let flag = " flag-token\n".to_string();
    assert_eq!(resolve_token(Some(&flag), None).unwrap(), "flag-token");
}

#[test]
fn test_resolve_token_missing_is_unauthenticated() {
    assert_eq!(resolve_token(None, None).unwrap(), "");
}

#[test]
fn test_resolve_token_empty_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_string_lossy().to_string();
    let err = resolve_token(None, Some(&path)).unwrap_err();
    assert!(err.contains("is empty"));
}

#[test]
fn test_parse_selection_dedups_and_skips_blanks() {
    let values: Vec<String> = ["bob", " carol ", "", "bob"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        parse_selection(&values),
        vec![UserId::from("bob"), UserId::from("carol")]
    );
}

#[test]
fn test_describe_outcome() {
    let unreachable = CrawlResult::new(UserId::from("ghost"));
    assert!(describe_outcome(&unreachable).starts_with("Could not fetch followers of ghost"));

    let mut empty = CrawlResult::new(UserId::from("loner"));
    empty.root_reachable = true;
    assert_eq!(describe_outcome(&empty), "loner has no followers");

    let mut found = CrawlResult::new(UserId::from("alice"));
    found.root_reachable = true;
    found.edges.insert(Edge::new("bob", "alice"));
    assert_eq!(
        describe_outcome(&found),
        "Found 1 connections between 2 users"
    );

    found.cancelled = true;
    assert!(describe_outcome(&found).starts_with("Crawl interrupted"));
}

#[test]
fn test_saved_root_is_highest_degree() {
    // carol follows alice and is followed by dave and erin: degree 3
    let edges: EdgeSet = [
        Edge::new("bob", "alice"),
        Edge::new("carol", "alice"),
        Edge::new("dave", "carol"),
        Edge::new("erin", "carol"),
    ]
    .into_iter()
    .collect();
    assert_eq!(saved_root(&edges), UserId::from("carol"));
}

#[test]
fn test_saved_root_tie_takes_first_login() {
    let edges: EdgeSet = [Edge::new("bob", "alice")].into_iter().collect();
    assert_eq!(saved_root(&edges), UserId::from("alice"));
}
