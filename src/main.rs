use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod config;
mod feed;
mod http;
mod mcp;
mod state;
mod telemetry;

#[derive(Parser)]
#[command(name = "news", about = "Technology news feeds as MCP tools")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// HTTP server: info, test endpoints, static page and MCP at /mcp
    Serve(http::ServeCmd),
    /// MCP server over stdio
    Mcp(mcp::McpCmd),
    /// Run one feed and print the formatted stories
    Stories(feed::cli::StoriesCmd),
    /// List the known sources
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // stderr only. Respect RUST_LOG and NEWS_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Serve(args) => http::run(args).await?,
        Commands::Mcp(args) => mcp::run(args).await?,
        Commands::Stories(args) => feed::cli::run_stories(args, cli.json).await?,
        Commands::Sources => feed::cli::run_sources(cli.json)?,
    }

    Ok(())
}
