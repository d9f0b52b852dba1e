// src/report.rs
// =============================================================================
// Runs a batch of fetches and turns the outcomes into something printable.
//
// Each URL is fetched independently; results come back in completion order
// and are then sorted back into input order for display.
//
// Rust concepts:
// - Streams: for running many fetches concurrently with a limit
// - Enums with data: Outcome::Failed carries the error kind
// - serde attributes: control how the JSON report looks
// =============================================================================

use futures::stream::{self, StreamExt};
use json_fetch::{ErrorKind, FetchError, JsonClient, TransportErrorKind};
use serde::Serialize;
use serde_json::Value;

/// Outcome of fetching one URL
//
// #[serde(tag = "outcome")] writes the variant name into an "outcome" field,
// e.g. {"outcome": "failed", "kind": "invalid_response"}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// HTTP 200 with a JSON body
    Ok,
    /// The fetch failed
    Failed {
        kind: ErrorKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        transport: Option<TransportErrorKind>,
    },
}

// Everything we know about one fetched URL
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    /// The URL as the user typed it
    pub url: String,
    /// What happened
    #[serde(flatten)]  // Merges the Outcome fields into this object
    pub outcome: Outcome,
    /// Human-readable error message, only for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchReport {
    pub fn from_result(url: String, result: &Result<Value, FetchError>) -> Self {
        match result {
            Ok(_) => FetchReport {
                url,
                outcome: Outcome::Ok,
                message: None,
            },
            Err(error) => {
                // Only transport failures have a finer-grained reason
                let transport = match error {
                    FetchError::Transport(cause) => Some(cause.kind()),
                    _ => None,
                };
                FetchReport {
                    url,
                    outcome: Outcome::Failed {
                        kind: error.kind(),
                        transport,
                    },
                    message: Some(error.to_string()),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok)
    }
}

/// Fetch every URL, at most `concurrency` at a time.
//
// Why concurrent?
// - Each fetch spends most of its time waiting on the network
// - While one request waits, others can make progress
// - The fetches don't share any state, so running them together is safe
pub async fn fetch_all(client: &JsonClient, urls: Vec<String>, concurrency: usize) -> Vec<FetchReport> {
    // Build one future per URL. Nothing runs yet: futures are lazy until
    // something polls them. The index remembers the input position.
    let futures = urls.into_iter().enumerate().map(move |(index, url)| async move {
        // Decode into serde_json::Value: we only care whether it's JSON
        let result = client.fetch::<Value>(&url).await;
        (index, FetchReport::from_result(url, &result))
    });

    // Turn the futures into a stream and run up to `concurrency` at once.
    // buffer_unordered yields results as they complete, not in input order.
    // max(1) guards against 0, which would never make progress
    let mut reports: Vec<(usize, FetchReport)> = stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    // Put the reports back in the order the user gave the URLs
    reports.sort_by_key(|(index, _)| *index);
    reports.into_iter().map(|(_, report)| report).collect()
}

// Prints the reports either as a table or JSON
pub fn print_reports(reports: &[FetchReport], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        print_table(reports);
    }
    Ok(())
}

// Prints reports as a human-readable table in the terminal
fn print_table(reports: &[FetchReport]) {
    println!("{:<60} {:<20} {:<30}", "URL", "OUTCOME", "MESSAGE");
    println!("{}", "=".repeat(110));

    for report in reports {
        let message = report.message.as_deref().unwrap_or("");

        // Truncate long URLs; count chars, not bytes, so we never cut a
        // multi-byte character in half
        let url_display = if report.url.chars().count() > 57 {
            let head: String = report.url.chars().take(57).collect();
            format!("{}...", head)
        } else {
            report.url.clone()
        };

        println!("{:<60} {:<20} {:<30}", url_display, format_outcome(&report.outcome), message);
    }

    println!();

    let ok_count = reports.iter().filter(|r| r.is_ok()).count();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", ok_count);
    println!("   ❌ Failed: {}", reports.len() - ok_count);
    println!("   📋 Total: {}", reports.len());
}

fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ok => "✅ OK".to_string(),
        Outcome::Failed { kind, .. } => match kind {
            ErrorKind::InvalidUrl => "🚫 INVALID URL".to_string(),
            ErrorKind::Transport => "🌐 TRANSPORT".to_string(),
            ErrorKind::InvalidResponse => "❌ BAD STATUS".to_string(),
            ErrorKind::InvalidData => "⚠️  BAD DATA".to_string(),
        },
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does buffer_unordered do?
//    - It polls up to N futures at the same time
//    - Finished results come out in completion order, hence the index
//
// 2. Why `move |(index, url)| async move { ... }`?
//    - The closure builds a new future for every URL
//    - `async move` gives each future its own copy of `url` and the
//      `client` reference, so they don't borrow from each other
//
// 3. What is #[serde(flatten)]?
//    - Instead of {"url": ..., "outcome": {...}} we get one flat object
//    - Easier to read and to filter with tools like jq
// -----------------------------------------------------------------------------
