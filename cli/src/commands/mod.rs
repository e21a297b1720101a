//! Command implementations for the restoa CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod text;
pub mod update;

use anyhow::Result;
use colored::Colorize;
use restoa_core::{DocumentPath, OaGraph, OaNode, ProjectionContext, Span, span};
use serde::Serialize;

/// Common error type for HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Build the HTTP client shared by all commands.
pub fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().build()?)
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Send a request, turning non-success statuses into [`CliError::Server`].
pub async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, CliError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CliError::Server {
        status: status.as_u16(),
        message: error_message(&body, status),
    })
}

/// Make an HTTP request and decode its JSON response.
pub async fn make_request<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CliError> {
    Ok(send(request).await?.json::<T>().await?)
}

/// Message of a `{"error":{"code","message"}}` body, or the raw body.
///
/// Not-found responses carry no body at all.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Pairs `start end start end ...` into spans.
pub fn pair_spans(offsets: &[usize]) -> Result<Vec<Span>> {
    if offsets.is_empty() || offsets.len() % 2 != 0 {
        anyhow::bail!("spans need an even number of offsets, got {}", offsets.len());
    }

    Ok(offsets
        .chunks_exact(2)
        .map(|pair| Span::new(pair[0], pair[1]))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Target URL covering every span: `<base>/api/documents/<doc>/#char=...`.
pub fn target_url(ctx: &ProjectionContext, document: &DocumentPath, spans: &[Span]) -> String {
    format!("{}/#{}", ctx.document_url(document), span::encode(spans))
}

// ============================================================================
// Shared output
// ============================================================================

impl HumanReadable for OaNode {
    fn print_human(&self) {
        println!("{} {}", "Annotation".green().bold(), self.id);
        println!("  {} {}", "Type:".cyan(), self.body);
        println!("  {} {}", "Target:".cyan(), self.target);
        println!(
            "  {} {}",
            "Serialized:".cyan(),
            format_timestamp(&self.serialized_at)
        );
    }
}

impl HumanReadable for OaGraph {
    fn print_human(&self) {
        println!("{}", "Annotations".green().bold());
        println!("{}", "=".repeat(80));

        if self.graph.is_empty() {
            println!("  {}", "(No annotations)".dimmed());
            return;
        }

        for node in &self.graph {
            let fragment = node.target.rsplit_once('#').map_or("", |(_, f)| f);
            println!(
                "  {:<12} {:<40} {}",
                node.body.yellow(),
                truncate(&node.id, 40),
                fragment.dimmed()
            );
        }

        println!();
        println!("  {} {}", "Total:".cyan(), self.graph.len());
    }
}

/// Format a timestamp for human display.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate a string for display, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
