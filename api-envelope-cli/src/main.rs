use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod utils;

/// envelope - inspect how query strings become filters and cache keys
#[derive(Parser)]
#[command(name = "envelope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file; ./config.toml is used when present
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string and print the normalized filter
    Filter {
        /// Raw query string, e.g. "page=2&limit=10&q=term"
        #[arg(value_name = "QUERY")]
        query: String,

        /// Override the configured page size cap
        #[arg(long, value_name = "N")]
        max_limit: Option<i64>,
    },
    /// Print the cache key for a query string
    CacheKey {
        /// Raw query string
        #[arg(value_name = "QUERY")]
        query: String,

        /// Override the configured cache key prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,

        /// Override the configured page size cap
        #[arg(long, value_name = "N")]
        max_limit: Option<i64>,

        /// Also print the segments that were hashed
        #[arg(long)]
        segments: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Filter { query, max_limit } => {
            commands::filter::execute(config, &query, max_limit)
        }
        Commands::CacheKey {
            query,
            prefix,
            max_limit,
            segments,
        } => commands::cache_key::execute(config, &query, prefix, max_limit, segments),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_command() {
        let cli = Cli::try_parse_from(["envelope", "filter", "page=2", "--max-limit", "50"]).unwrap();
        match cli.command {
            Commands::Filter { query, max_limit } => {
                assert_eq!(query, "page=2");
                assert_eq!(max_limit, Some(50));
            }
            Commands::CacheKey { .. } => panic!("expected filter command"),
        }
    }

    #[test]
    fn test_parse_cache_key_command() {
        let cli = Cli::try_parse_from([
            "envelope",
            "cache-key",
            "q=term",
            "--prefix",
            "users:",
            "--segments",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::CacheKey {
                query,
                prefix,
                segments,
                ..
            } => {
                assert_eq!(query, "q=term");
                assert_eq!(prefix.as_deref(), Some("users:"));
                assert!(segments);
            }
            Commands::Filter { .. } => panic!("expected cache-key command"),
        }
    }

    #[test]
    fn test_query_is_required() {
        assert!(Cli::try_parse_from(["envelope", "filter"]).is_err());
    }
}
