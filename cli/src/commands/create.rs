//! CREATE command - Annotate character spans of a document.

use anyhow::Result;
use clap::Args;
use restoa_core::{ANNOTATIONS_ROOT, DocumentPath, OaNode, ProjectionContext};

use super::{make_request, output, pair_spans, target_url};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Document path, e.g. news/doc1
    pub document: DocumentPath,

    /// Character offsets as start/end pairs: START END [START END ...]
    #[arg(required = true, num_args = 2..)]
    pub offsets: Vec<usize>,

    /// Annotation type, e.g. Person
    #[arg(long = "type", short = 't')]
    pub label: String,
}

/// Execute the create command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: CreateArgs,
) -> Result<()> {
    let spans = pair_spans(&args.offsets)?;
    let ctx = ProjectionContext::new(base_url);
    let url = format!("{}{ANNOTATIONS_ROOT}/", ctx.base_url());

    let body = serde_json::json!({
        "target": target_url(&ctx, &args.document, &spans),
        "body": args.label,
    });

    let node: OaNode = make_request(client.post(&url).json(&body)).await?;

    output(&node, human)
}
