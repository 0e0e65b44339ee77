//! Command-line argument parsing for Precedent
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Precedent - extract, index, and search organizational decision records
#[derive(Parser, Debug)]
#[command(name = "precedent")]
#[command(version = "0.1.0")]
#[command(about = "Turn scattered meeting notes into a searchable decision memory", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults to ~/.precedent/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract decision records from documents and index them
    Ingest {
        /// Documents to ingest (plain text or markdown)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Search indexed decisions with a natural-language query
    Search {
        /// Query text
        #[arg(value_name = "QUERY")]
        query: String,

        /// Only return decisions owned by this team
        #[arg(long)]
        team: Option<String>,

        /// Decision year (accepted but not applied yet; decision dates
        /// are stored as free-form text)
        #[arg(long)]
        year: Option<i32>,

        /// Maximum number of results
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Show how many decision records the store holds
    Stats,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default tracing filter directive when RUST_LOG is unset
    pub fn log_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "precedent=error",
            Verbosity::Normal => "precedent=info",
            Verbosity::Verbose => "precedent=debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_quiet() {
        let args = Args {
            config: None,
            verbose: 0,
            quiet: true,
            command: Commands::Stats,
        };
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert_eq!(args.verbosity().log_directive(), "precedent=error");
    }

    #[test]
    fn test_verbosity_normal() {
        let args = Args {
            config: None,
            verbose: 0,
            quiet: false,
            command: Commands::Stats,
        };
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_counts_up() {
        let args = Args {
            config: None,
            verbose: 2,
            quiet: false,
            command: Commands::Stats,
        };
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
        assert_eq!(args.verbosity().log_directive(), "trace");
    }

    #[test]
    fn test_search_defaults() {
        let args = Args::parse_from(["precedent", "search", "database migration"]);
        match args.command {
            Commands::Search {
                query,
                team,
                year,
                limit,
            } => {
                assert_eq!(query, "database migration");
                assert!(team.is_none());
                assert!(year.is_none());
                assert_eq!(limit, 5);
            }
            _ => panic!("expected search subcommand"),
        }
    }

    #[test]
    fn test_ingest_requires_files() {
        assert!(Args::try_parse_from(["precedent", "ingest"]).is_err());
    }
}
