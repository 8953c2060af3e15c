use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::{self, Settings};
use crate::fetcher::{BatchOutcome, IssueFetcher, DEFAULT_PAGE_SIZE};
use crate::providers::jira::JiraClient;
use crate::render::render_issue;
use crate::writer::MarkdownWriter;

#[derive(Debug, Parser)]
#[command(
    name = "jira-md",
    version,
    about = "Fetch Jira issues and convert them to development-ready Markdown files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch Jira issue(s) and write one Markdown file per issue
    Fetch(FetchArgs),
    /// Show version information
    Version,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["key", "jql", "keys_file"])
))]
pub struct FetchArgs {
    /// Fetch a single issue by key (e.g. UEP-123)
    #[arg(short, long, value_name = "KEY")]
    pub key: Option<String>,
    /// Fetch every issue matching a JQL query
    #[arg(short = 'q', long, value_name = "JQL")]
    pub jql: Option<String>,
    /// Fetch every issue key found in a text file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub keys_file: Option<PathBuf>,
    /// Maximum number of issues for --jql (0 = no limit)
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
    /// Issues requested per search page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Output directory (default: OUTPUT_DIR or "outputs")
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Keep existing files and write `__vN` copies instead
    #[arg(long)]
    pub no_overwrite: bool,
    /// Path to a .env file (default: .env in the current directory)
    #[arg(short = 'e', long = "env", value_name = "PATH")]
    pub env_file: Option<PathBuf>,
    /// Path to a config.toml (default: ~/.jira-md/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl FetchArgs {
    fn limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }
}

pub async fn handle_fetch(args: FetchArgs) -> Result<()> {
    config::load_env_file(args.env_file.as_deref())?;
    let app_config = config::load_config(args.config.as_deref())?;
    let mut settings = Settings::from_env(app_config)?;
    if let Some(out) = &args.out {
        settings.output_dir = out.clone();
    }

    let client = JiraClient::new(&settings.base_url, &settings.email, &settings.api_token);
    let fetcher = IssueFetcher::new(Box::new(client)).with_page_size(args.page_size);
    let writer = MarkdownWriter::new(&settings.output_dir, !args.no_overwrite);

    if let Some(key) = &args.key {
        println!("Fetching single issue: {key}");
        let issue = fetcher
            .fetch_single(key)
            .await
            .with_context(|| format!("Failed to fetch {key}"))?;
        let path = writer.write(&issue, &render_issue(&issue))?;
        println!("✓ {}: {}", issue.key, issue.summary);
        println!("  {}", path.display());
    } else {
        let outcome = if let Some(jql) = &args.jql {
            println!("Fetching issues with JQL: {jql}");
            fetcher.fetch_batch(jql, args.limit()).await?
        } else if let Some(path) = &args.keys_file {
            println!("Fetching issues listed in {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            fetcher.fetch_from_text(&text).await
        } else {
            bail!("Either --key, --jql or --keys-file must be specified");
        };
        write_batch(outcome, &writer)?;
    }

    println!("Done! Output directory: {}", settings.output_dir.display());
    Ok(())
}

fn write_batch(outcome: BatchOutcome, writer: &MarkdownWriter) -> Result<()> {
    if outcome.fetched == 0 {
        println!("No issues found");
        return Ok(());
    }

    let items: Vec<_> = outcome
        .issues
        .into_iter()
        .map(|issue| {
            let content = render_issue(&issue);
            (issue, content)
        })
        .collect();
    let written = writer.write_batch(&items);

    for path in &written.written {
        println!("  {}", path.display());
    }
    for (key, err) in outcome.failures.iter().chain(written.failures.iter()) {
        println!("✗ {key}: {err}");
    }

    let failed = outcome.failures.len() + written.failures.len();
    println!(
        "Fetched {}, normalized {}, written {}, failed {}",
        outcome.fetched,
        items.len(),
        written.written.len(),
        failed
    );
    check_batch(written.written.len(), failed)
}

/// A batch with nothing written fails; a partial one succeeds with a warning.
fn check_batch(written: usize, failed: usize) -> Result<()> {
    if written == 0 {
        bail!("No issues were written ({failed} failed)");
    }
    if failed > 0 {
        println!("Warning: {failed} issue(s) skipped");
    }
    Ok(())
}

pub fn print_version() {
    println!("jira-md version {}", env!("CARGO_PKG_VERSION"));
}
