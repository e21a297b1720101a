//! GET command - Show one annotation.

use anyhow::Result;
use clap::Args;
use restoa_core::{AnnotationId, DocumentPath, OaNode, ProjectionContext};

use super::{make_request, output};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Document path, e.g. news/doc1
    pub document: DocumentPath,

    /// Annotation id, e.g. T3
    pub id: AnnotationId,
}

/// Execute the get command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: GetArgs,
) -> Result<()> {
    let ctx = ProjectionContext::new(base_url);
    let url = ctx.annotation_url(&args.document, &args.id);

    let node: OaNode = make_request(client.get(&url)).await?;

    output(&node, human)
}
