use crate::CLAP_STYLING;
use clap::{arg, command};

const FORMATS: [&str; 6] = ["text", "json", "csv", "markdown", "md", "graph"];

fn output_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-s --"select" <USER>)
            .required(false)
            .help("Only show connections touching these users (repeatable or comma separated)")
            .action(clap::ArgAction::Append)
            .value_delimiter(','),
    )
    .arg(
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json, csv, markdown, graph")
            .value_parser(FORMATS)
            .default_value("text"),
    )
    .arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to file (default: print to stdout)")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("follownet")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("follownet")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(output_args(
            command!("crawl")
                .about("Crawl the followers network of a GitHub user")
                .arg(
                    arg!(-u --"user" <USER>)
                        .required(true)
                        .help("The GitHub username to start from"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("How many hops away from the user to explore")
                        .value_parser(clap::value_parser!(u64).range(0..=10))
                        .default_value("2"),
                )
                .arg(
                    arg!(-m --"max-followers" <NUM>)
                        .required(false)
                        .help("Maximum number of followers taken from each user's first page")
                        .value_parser(clap::value_parser!(u64).range(1..=100))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"token" <TOKEN>)
                        .required(false)
                        .env("GITHUB_TOKEN")
                        .hide_env_values(true)
                        .help("GitHub API token (unauthenticated requests are heavily rate limited)"),
                )
                .arg(
                    arg!(--"token-file" <PATH>)
                        .required(false)
                        .help("Read the GitHub API token from a file, e.g. ~/.config/follownet/token"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Maximum number of follower requests in flight")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(--"api-base" <URL>)
                        .required(false)
                        .help("GitHub API base URL (for GitHub Enterprise)")
                        .default_value("https://api.github.com"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                ),
        ))
        .subcommand(output_args(
            command!("render")
                .about("Render a saved follower list (CSV triples) without crawling")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("CSV file of follower,relation,followee rows")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        ))
}
