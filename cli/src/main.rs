//! Command-line client for the restoa annotation server.
//!
//! This CLI tool provides commands for every API operation:
//! - text: Print a document's raw text
//! - list: List annotations, of every document or of one
//! - get: Show a single annotation
//! - create: Annotate character spans of a document
//! - update: Replace an annotation's spans and type
//! - delete: Delete an annotation
//!
//! Configuration via environment:
//! - RESTOA_URL: Base URL of the server (default: http://localhost:47111)

mod commands;

use clap::{Parser, Subcommand};

use commands::{
    create::CreateArgs, delete::DeleteArgs, get::GetArgs, list::ListArgs, text::TextArgs,
    update::UpdateArgs,
};

/// restoa CLI
///
/// Read and edit standoff annotations over their Open Annotation view.
/// Prints JSON by default; --human prints formatted text.
#[derive(Parser)]
#[command(name = "restoa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// restoa server URL
    #[arg(
        long,
        env = "RESTOA_URL",
        default_value = "http://localhost:47111",
        global = true
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw text of a document
    Text(TextArgs),

    /// List annotations
    List(ListArgs),

    /// Show one annotation
    Get(GetArgs),

    /// Create an annotation
    Create(CreateArgs),

    /// Replace an annotation's spans and type
    Update(UpdateArgs),

    /// Delete an annotation
    Delete(DeleteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let client = match commands::build_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Text(args) => commands::text::execute(&client, &cli.url, cli.human, args).await,
        Commands::List(args) => commands::list::execute(&client, &cli.url, cli.human, args).await,
        Commands::Get(args) => commands::get::execute(&client, &cli.url, cli.human, args).await,
        Commands::Create(args) => {
            commands::create::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Update(args) => {
            commands::update::execute(&client, &cli.url, cli.human, args).await
        }
        Commands::Delete(args) => {
            commands::delete::execute(&client, &cli.url, cli.human, args).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
