//! CLI definitions for the `agent-answer` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ask a hosted agent and print its answer with sources
#[derive(Parser, Debug)]
#[command(name = "agent-answer", version, about = "Agent answer + citation extractor")]
pub struct Cli {
    /// TOML config file (environment variables override it)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `agent_answer=debug`
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the response JSON
    Ask(AskArgs),
    /// Read a request body from stdin and print the response envelope
    Handle,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Session to continue (a new one is generated when omitted)
    #[arg(short, long)]
    pub session_id: Option<String>,

    /// User query (positional)
    pub query: String,
}

impl AskArgs {
    /// The given session id, or a fresh UUID.
    pub fn session_id(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_ask_with_session() {
        let cli =
            Cli::try_parse_from(["agent-answer", "ask", "-s", "sess-1", "How many users?"]).unwrap();
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.query, "How many users?");
                assert_eq!(args.session_id(), "sess-1");
            }
            other => panic!("expected Ask, got {other:?}"),
        }
        assert_eq!(cli.log, "info");
        assert!(cli.config.is_none());
    }

    #[test]
    fn ask_without_session_generates_uuid() {
        let cli = Cli::try_parse_from(["agent-answer", "ask", "hello"]).unwrap();
        let Commands::Ask(args) = cli.command else {
            panic!("expected Ask");
        };
        let session = args.session_id();
        assert!(uuid::Uuid::parse_str(&session).is_ok());
    }

    #[test]
    fn parse_handle_with_global_options() {
        let cli = Cli::try_parse_from([
            "agent-answer",
            "handle",
            "--config",
            "answer.toml",
            "--log",
            "debug",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Handle));
        assert_eq!(cli.config, Some(PathBuf::from("answer.toml")));
        assert_eq!(cli.log, "debug");
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["agent-answer"]).is_err());
    }

    #[test]
    fn parse_ask_missing_query_is_error() {
        assert!(Cli::try_parse_from(["agent-answer", "ask"]).is_err());
    }
}
