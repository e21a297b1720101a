//! LIST command - List annotations.

use anyhow::Result;
use clap::Args;
use restoa_core::{ANNOTATIONS_ROOT, DocumentPath, OaGraph, ProjectionContext};

use super::{make_request, output};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only list this document's annotations
    pub document: Option<DocumentPath>,
}

/// Execute the list command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ListArgs,
) -> Result<()> {
    let ctx = ProjectionContext::new(base_url);
    let url = match &args.document {
        Some(document) => format!("{}/", ctx.annotations_url(document)),
        None => format!("{}{ANNOTATIONS_ROOT}/", ctx.base_url()),
    };

    let graph: OaGraph = make_request(client.get(&url)).await?;

    output(&graph, human)
}
