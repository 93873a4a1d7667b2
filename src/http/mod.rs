//! HTTP surface for `news serve`: info and test endpoints, the static index
//! page, and the streamable MCP service.

pub mod handlers;
pub mod router;

pub use cli::{run, ServeCmd};
pub use router::create_router;

mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use tracing::Instrument;

    use crate::config::{Config, Overrides};
    use crate::state::AppState;
    use crate::telemetry;
    use crate::telemetry::ops::serve::Phase as ServePhase;

    #[derive(Debug, Parser, Default)]
    #[command(name = "serve", about = "Serve the info/test endpoints and MCP over HTTP")]
    pub struct ServeCmd {
        #[arg(long, help = "Address to listen on (overrides NEWS_BIND_ADDR)")]
        pub bind: Option<String>,
        #[arg(long, help = "Directory holding index.html (overrides NEWS_STATIC_DIR)")]
        pub static_dir: Option<PathBuf>,
        #[arg(long, help = "Maximum concurrent MCP tool calls (overrides MCP_MAX_CONCURRENCY)")]
        pub max_concurrency: Option<usize>,
    }

    pub async fn run(cmd: ServeCmd) -> Result<()> {
        let config = Config::from_env_and_args(&Overrides {
            bind_addr: cmd.bind,
            static_dir: cmd.static_dir,
            max_concurrency: cmd.max_concurrency,
        });
        let log = telemetry::serve();
        let root = log.root_span_kv([("bind", config.bind_addr().to_string())]);

        let state = AppState::new(config);
        let app = super::create_router(state.clone());

        let listener = tokio::net::TcpListener::bind(state.config.bind_addr())
            .instrument(log.span(&ServePhase::Bind))
            .instrument(root.clone())
            .await
            .with_context(|| format!("failed to bind {}", state.config.bind_addr()))?;
        log.info_kv("listening", [
            ("addr", state.config.bind_addr().to_string()),
            ("mcp", "/mcp".to_string()),
            ("static_dir", state.config.static_dir().display().to_string()),
        ]);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future()
            .instrument(log.span(&ServePhase::Http))
            .instrument(root)
            .await
            .context("http server failed")?;
        log.info("server stopped");
        Ok(())
    }

    async fn shutdown_signal() {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
