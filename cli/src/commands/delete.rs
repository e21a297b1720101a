//! DELETE command - Delete an annotation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use restoa_core::{AnnotationId, DocumentPath, ProjectionContext};
use serde::Serialize;

use super::{HumanReadable, output, send};

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Document path, e.g. news/doc1
    pub document: DocumentPath,

    /// Annotation id, e.g. T3
    pub id: AnnotationId,

    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Annotation a delete was sent for.
///
/// The server answers 204 whether or not the id existed, so this says
/// nothing about whether anything was removed.
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub document: DocumentPath,
    pub id: AnnotationId,
}

impl HumanReadable for DeleteResult {
    fn print_human(&self) {
        println!("{}", "Delete accepted.".green().bold());
        println!();
        println!("  {} {}", "Document:".cyan(), self.document);
        println!("  {} {}", "ID:".cyan(), self.id);
    }
}

/// Execute the delete command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: DeleteArgs,
) -> Result<()> {
    // Confirmation prompt for interactive use
    if human && !args.yes {
        eprint!(
            "{} Delete annotation {} of {}? [y/N] ",
            "Warning:".yellow().bold(),
            args.id,
            args.document
        );

        use std::io::Write;
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let ctx = ProjectionContext::new(base_url);
    let url = ctx.annotation_url(&args.document, &args.id);

    send(client.delete(&url)).await?;

    output(
        &DeleteResult {
            document: args.document,
            id: args.id,
        },
        human,
    )
}
