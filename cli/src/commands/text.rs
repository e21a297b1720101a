//! TEXT command - Print a document's raw text.

use anyhow::Result;
use clap::Args;
use restoa_core::{DocumentPath, ProjectionContext};
use serde::Serialize;

use super::{HumanReadable, output, send};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Document path relative to the data directory, e.g. news/doc1
    pub document: DocumentPath,
}

/// A document and its text.
#[derive(Debug, Serialize)]
pub struct DocumentText {
    pub document: DocumentPath,
    pub text: String,
}

impl HumanReadable for DocumentText {
    fn print_human(&self) {
        println!("{}", self.text);
    }
}

/// Execute the text command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: TextArgs,
) -> Result<()> {
    let ctx = ProjectionContext::new(base_url);
    let url = format!("{}/", ctx.document_url(&args.document));

    let text = send(client.get(&url)).await?.text().await?;

    output(
        &DocumentText {
            document: args.document,
            text,
        },
        human,
    )
}
