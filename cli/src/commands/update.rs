//! UPDATE command - Replace an annotation's spans and type.

use anyhow::Result;
use clap::Args;
use restoa_core::{AnnotationId, DocumentPath, OaNode, ProjectionContext};

use super::{make_request, output, pair_spans, target_url};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Document path, e.g. news/doc1
    pub document: DocumentPath,

    /// Annotation id, e.g. T3
    pub id: AnnotationId,

    /// New character offsets as start/end pairs
    #[arg(required = true, num_args = 2..)]
    pub offsets: Vec<usize>,

    /// New annotation type
    #[arg(long = "type", short = 't')]
    pub label: String,
}

/// Execute the update command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: UpdateArgs,
) -> Result<()> {
    let spans = pair_spans(&args.offsets)?;
    let ctx = ProjectionContext::new(base_url);
    let url = ctx.annotation_url(&args.document, &args.id);

    let body = serde_json::json!({
        "@id": url,
        "target": target_url(&ctx, &args.document, &spans),
        "body": args.label,
    });

    let node: OaNode = make_request(client.put(&url).json(&body)).await?;

    output(&node, human)
}
