//! hubsearch entry point.
//!
//! Runs a single query when one is given on the command line, otherwise reads
//! commands from stdin. Logging goes to stderr so results on stdout stay clean.

use anyhow::Result;
use clap::Parser;
use hubsearch_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod output;
mod repl;

use app::App;

/// Search GitHub repositories from the terminal.
#[derive(Debug, Parser)]
#[command(name = "hubsearch", version, about)]
struct Args {
    /// Query to run once. Starts the interactive prompt when omitted.
    query: Option<String>,

    /// Number of result pages to walk through in one-shot mode.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Fetch the owner avatar of every printed repository.
    #[arg(long)]
    avatars: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::load()?;
    tracing::debug!(api = %config.api_base_url, page_size = config.page_size, "configuration loaded");

    let app = App::new(&config)?;
    let reporter = app.report_pagination_errors();

    let result = match args.query {
        Some(query) => app.run_once(&query, args.pages, args.avatars).await,
        None => repl::run(&app).await,
    };

    reporter.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_one_shot() {
        let args = Args::try_parse_from(["hubsearch", "tokio", "--pages", "3", "--avatars"]).unwrap();
        assert_eq!(args.query.as_deref(), Some("tokio"));
        assert_eq!(args.pages, 3);
        assert!(args.avatars);
    }

    #[test]
    fn test_args_interactive_defaults() {
        let args = Args::try_parse_from(["hubsearch"]).unwrap();
        assert!(args.query.is_none());
        assert_eq!(args.pages, 1);
        assert!(!args.avatars);
    }

    #[test]
    fn test_args_rejects_zero_pages() {
        assert!(Args::try_parse_from(["hubsearch", "tokio", "--pages", "0"]).is_err());
    }
}
