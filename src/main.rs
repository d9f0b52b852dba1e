// src/main.rs
// =============================================================================
// This is the entry point of the json-fetch CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = all fetches ok, 1 = a fetch failed, 2 = error)
//
// Rust concepts used:
// - async/await: The fetches are network I/O, so they run on tokio
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands and outcomes
// =============================================================================

// Module declarations for the binary-only parts
mod cli;           // src/cli.rs - command-line parsing
mod report;        // src/report.rs - batch fetching and printing results

// Import items we need from our modules and from the library crate
use cli::{Cli, Commands};
use clap::Parser;  // Parser trait enables the parse() method
use json_fetch::{logging, JsonClient};
use serde_json::Value;

// anyhow::Result lets the binary return any error type with the ? operator.
// The library uses its own typed FetchError instead.
use anyhow::Result;

// #[tokio::main] turns our async main into a real main function that
// starts a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run the application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error (e.g. JSON output failed): print it, exit 2.
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every fetch succeeded
//   Ok(1) = at least one fetch failed
//   Err   = something else went wrong (exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Logging must be set up before the first fetch, otherwise decode
    // warnings from the library have nowhere to go
    logging::init(cli.log_format);

    // One client for the whole run; cloning it is cheap and every fetch
    // is independent anyway
    let client = JsonClient::with_config(cli.client_config());

    // Match on which subcommand was used
    match cli.command {
        Commands::Get { url, compact } => handle_get(&client, &url, compact).await,
        Commands::Batch { urls, json, concurrency } => {
            handle_batch(&client, urls, json, usize::from(concurrency)).await
        }
    }
}

// Handles the 'get' subcommand
// Parameters:
//   client: the JSON client built from the CLI flags
//   url: the URL to fetch
//   compact: print on one line instead of pretty-printing
async fn handle_get(client: &JsonClient, url: &str, compact: bool) -> Result<i32> {
    // serde_json::Value accepts any JSON, so decoding only fails when the
    // body isn't JSON at all
    match client.fetch::<Value>(url).await {
        Ok(value) => {
            let rendered = if compact {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            println!("{}", rendered);
            Ok(0)
        }
        Err(e) => {
            // A failed fetch is an expected outcome, not an internal error,
            // so it's logged and mapped to exit code 1
            tracing::error!(url, kind = %e.kind(), "fetch failed: {}", e);
            Ok(1)
        }
    }
}

// Handles the 'batch' subcommand
// Parameters:
//   urls: every URL given on the command line
//   json: whether to output JSON format
//   concurrency: how many requests may be in flight at once
async fn handle_batch(client: &JsonClient, urls: Vec<String>, json: bool, concurrency: usize) -> Result<i32> {
    tracing::info!(count = urls.len(), concurrency, "fetching URLs");

    // Fetch everything, then print the table or JSON report
    let reports = report::fetch_all(client, urls, concurrency).await;
    report::print_reports(&reports, json)?;

    // Exit code 1 if any single fetch failed
    if reports.iter().all(|r| r.is_ok()) {
        Ok(0)
    } else {
        Ok(1)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the logic in run() and not in main()?
//    - main() can't easily return an exit code together with an error
//    - run() returns Result<i32>, and main() turns that into the exit code
//
// 2. Why does a failed fetch return Ok(1) rather than Err?
//    - Err means "the tool itself broke" (exit code 2)
//    - A URL returning 404 is a normal answer the tool reports
//
// 3. What is `kind = %e.kind()` inside tracing::error!?
//    - It attaches a structured field to the log event
//    - The % means "record this using its Display implementation"
// -----------------------------------------------------------------------------
