// reposcope - browse one branch of one GitHub repository in the terminal.
// Fetches the repo metadata, README, and recursive tree snapshot
// (disk-cached), then lets you filter, expand, preview, and download files.

mod app;
mod browser;
mod cache;
mod error;
mod format;
mod github;
mod meta;
mod tree;
mod ui;

use clap::Parser;

use crate::app::App;
use crate::github::GitHubClient;

/// Terminal browser for a GitHub repository's file tree.
#[derive(Parser, Debug)]
#[command(name = "reposcope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository in owner/name form (e.g. rust-lang/rust)
    repo: String,

    /// Branch to browse (defaults to the repository's default branch)
    #[arg(short, long)]
    branch: Option<String>,

    /// Refetch repo metadata, tree, and README instead of reading
    /// cached snapshots
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (owner, repo) = args
        .repo
        .split_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or("expected repository in owner/name form")?;

    // Token raises rate limits; absence just means unauthenticated limits.
    let client = GitHubClient::from_env()?;

    let mut terminal = ratatui::init();
    let result = App::new(
        client,
        owner.to_string(),
        repo.to_string(),
        args.branch,
        args.no_cache,
    )
    .run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}
