//! Line-oriented interactive mode.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::output;

const HELP: &str = "\
commands:
  <text>            search repositories
  :more             load the next page
  :avatars          fetch avatars of the current results
  :recent           list recent searches
  :suggest <text>   recent searches containing <text>
  :forget <query>   remove a recent search
  :clear-history    remove all recent searches
  :clear-cache      drop cached avatars
  :help             show this help
  :quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    More,
    Avatars,
    Recent,
    Suggest(String),
    Forget(String),
    ClearHistory,
    ClearCache,
    Help,
    Quit,
    Unknown(String),
    Blank,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Blank;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Command::Search(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "more" | "m" => Command::More,
            "avatars" => Command::Avatars,
            "recent" => Command::Recent,
            "suggest" => Command::Suggest(arg.to_string()),
            "forget" if !arg.is_empty() => Command::Forget(arg.to_string()),
            "clear-history" => Command::ClearHistory,
            "clear-cache" => Command::ClearCache,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Read commands from stdin until `:quit` or end of input.
pub async fn run(app: &App) -> Result<()> {
    println!("type a query to search, :help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Blank => {}
            Command::Search(query) => {
                app.run_search(&query).await;
            }
            Command::More => {
                if !app.more().await {
                    println!("nothing more to load");
                }
            }
            Command::Avatars => app.fetch_avatars().await,
            Command::Recent => {
                for entry in app.recent().recent() {
                    println!("{}", output::recent_line(&entry));
                }
            }
            Command::Suggest(input) => {
                for entry in app.recent().suggestions(&input) {
                    println!("{}", entry.query);
                }
            }
            Command::Forget(query) => app.recent().forget(&query),
            Command::ClearHistory => app.recent().forget_all(),
            Command::ClearCache => {
                app.avatars().clear();
                println!("{}", output::cache_stats(&app.avatars().stats()));
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => println!("unknown command {input}; :help lists commands"),
        }
    }

    tracing::debug!(query = %app.search().query(), "leaving interactive mode");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        assert_eq!(Command::parse("  tokio runtime "), Command::Search("tokio runtime".into()));
        assert_eq!(Command::parse("   "), Command::Blank);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(":more"), Command::More);
        assert_eq!(Command::parse(":m"), Command::More);
        assert_eq!(Command::parse(":recent"), Command::Recent);
        assert_eq!(Command::parse(":suggest  sw "), Command::Suggest("sw".into()));
        assert_eq!(Command::parse(":forget swift ui"), Command::Forget("swift ui".into()));
        assert_eq!(Command::parse(":clear-history"), Command::ClearHistory);
        assert_eq!(Command::parse(":clear-cache"), Command::ClearCache);
        assert_eq!(Command::parse(":q"), Command::Quit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse(":forget"), Command::Unknown(":forget".into()));
        assert_eq!(Command::parse(":bogus 1"), Command::Unknown(":bogus 1".into()));
    }
}
