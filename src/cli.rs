// src/cli.rs
// =============================================================================
// Command-line interface for the json-fetch binary, built with clap's
// derive API.
//
// Rust concepts:
// - Structs: the global flags plus the chosen subcommand
// - Enums: one variant per subcommand
// - Derive macros: clap generates the parsing code
// =============================================================================

use clap::{Parser, Subcommand};
use json_fetch::logging::LogFormat;
use json_fetch::{ClientConfig, DecodeDiagnostics};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "json-fetch",
    version,
    about = "Fetch JSON from URLs and check that it decodes",
    long_about = "json-fetch issues a single GET per URL, accepts only HTTP 200 and decodes \
                  the body as JSON. Failures are reported as invalid_url, transport, \
                  invalid_response or invalid_data."
)]
pub struct Cli {
    /// Log output format (logs go to stderr, filtered by RUST_LOG)
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Don't log why a response body failed to decode
    #[arg(long, global = true)]
    pub quiet_decode_errors: bool,

    // global = true lets the flags above appear before or after the
    // subcommand name
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Client settings derived from the global flags.
    pub fn client_config(&self) -> ClientConfig {
        let decode_diagnostics = if self.quiet_decode_errors {
            DecodeDiagnostics::Silent
        } else {
            DecodeDiagnostics::Log
        };
        ClientConfig { decode_diagnostics }
    }
}

// This enum defines our subcommands (get, batch)
//
// Each variant's fields become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one URL and print the decoded JSON
    ///
    /// Example: json-fetch get https://api.github.com/repos/rust-lang/rust
    Get {
        /// URL to fetch (must be absolute http or https)
        url: String,

        /// Print the JSON on one line instead of pretty-printing it
        #[arg(long)]
        compact: bool,
    },

    /// Fetch several URLs concurrently and report the outcome of each
    ///
    /// Example: json-fetch batch https://a.example/x.json https://b.example/y.json --json
    Batch {
        /// URLs to fetch
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// How many requests may be in flight at once
        ///
        /// range(1..) makes clap reject 0 before our code ever sees it
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: u16,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Where does the help text come from?
//    - clap uses the /// doc comments on fields and variants
//    - The first line is the short help, the rest shows up in --help
//
// 2. Why Vec<String> for urls?
//    - clap collects every remaining positional argument into the Vec
//    - #[arg(required = true)] means at least one must be given
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from(["json-fetch", "get", "https://example.com/a.json", "--compact"]).unwrap();
        match cli.command {
            Commands::Get { url, compact } => {
                assert_eq!(url, "https://example.com/a.json");
                assert!(compact);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_parse_batch_with_global_flags() {
        let cli = Cli::try_parse_from([
            "json-fetch",
            "batch",
            "https://a.example/1",
            "https://b.example/2",
            "--concurrency",
            "4",
            "--quiet-decode-errors",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.client_config().decode_diagnostics, DecodeDiagnostics::Silent);
        match cli.command {
            Commands::Batch { urls, json, concurrency } => {
                assert_eq!(urls.len(), 2);
                assert!(!json);
                assert_eq!(concurrency, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_batch_needs_urls_and_positive_concurrency() {
        assert!(Cli::try_parse_from(["json-fetch", "batch"]).is_err());
        assert!(Cli::try_parse_from(["json-fetch", "batch", "https://a.example", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_default_config_logs_decode_errors() {
        let cli = Cli::try_parse_from(["json-fetch", "get", "https://example.com"]).unwrap();
        assert_eq!(cli.client_config(), ClientConfig::default());
    }
}
