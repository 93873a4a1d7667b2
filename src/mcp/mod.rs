pub mod server;
pub mod tools;
pub mod types;

pub use cli::{run, McpCmd};
pub use server::{http_service, NewsMcpServer};

mod cli {
    use anyhow::Result;
    use clap::Parser;
    use tracing::Instrument;

    use crate::config::{Config, Overrides};
    use crate::state::AppState;
    use crate::telemetry;
    use crate::telemetry::ops::serve::Phase as ServePhase;

    #[derive(Debug, Parser, Default)]
    #[command(name = "mcp", about = "Serve the news tools over MCP stdio")]
    pub struct McpCmd {
        #[arg(long, help = "Maximum concurrent MCP tool calls (overrides MCP_MAX_CONCURRENCY)")]
        pub max_concurrency: Option<usize>,
    }

    pub async fn run(cmd: McpCmd) -> Result<()> {
        let config = Config::from_env_and_args(&Overrides { max_concurrency: cmd.max_concurrency, ..Default::default() });
        let log = telemetry::serve();
        let span = log.span_kv(&ServePhase::Mcp, [("max_concurrency", config.max_concurrency().to_string())]);
        let server = super::NewsMcpServer::new(AppState::new(config));
        super::server::run_stdio(server).instrument(span).await
    }
}
