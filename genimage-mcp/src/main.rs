//! genimage MCP server
//!
//! MCP server that generates images from text prompts and saves them as PNG.

use anyhow::Result;
use clap::Parser;
use genimage_mcp::ImageServer;
use genimage_mcp_common::tracing::init_tracing;
use genimage_mcp_common::{Config, McpServerBuilder, TransportArgs};
use std::path::PathBuf;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "genimage-mcp")]
#[command(about = "MCP server that turns text prompts into PNG files")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,

    /// Open each saved image in the system viewer
    #[arg(long)]
    show_image: bool,

    /// Default destination directory, overrides OUTPUT_IMAGE_PATH
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Model id or alias, overrides GEMINI_IMAGE_MODEL
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("genimage-mcp server starting...");

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(model) = &args.model {
        config = config.with_model(model)?;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = Some(dir);
    }
    config.show_image |= args.show_image;

    tracing::info!(
        model = %config.model,
        output_dir = ?config.output_dir,
        show_image = config.show_image,
        "Configuration loaded"
    );

    let server = ImageServer::new(config)?;

    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
