use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use rmcp::{
    ErrorData as McpError,
    ServiceExt,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam,
        CallToolResult,
        Implementation,
        ListToolsResult,
        PaginatedRequestParam,
        ProtocolVersion,
        ServerCapabilities,
        ServerInfo,
    },
    service::{QuitReason, RequestContext, RoleServer},
    transport::streamable_http_server::{
        StreamableHttpServerConfig,
        StreamableHttpService,
        session::local::LocalSessionManager,
    },
};
use tokio::io::{stdin, stdout};
use tokio::sync::Semaphore;

use crate::mcp::tools;
use crate::state::AppState;

#[derive(Clone)]
pub struct NewsMcpServer {
    state: AppState,
    info: ServerInfo,
    semaphore: Arc<Semaphore>,
}

impl NewsMcpServer {
    pub fn new(state: AppState) -> Self {
        let capabilities = ServerCapabilities::builder().enable_tools().build();
        let info = ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities,
            server_info: Implementation {
                name: "news".to_string(),
                title: Some("News MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only tools that fetch and format the current stories of several technology news feeds."
                    .to_string(),
            ),
        };
        let semaphore = Arc::new(Semaphore::new(state.config.max_concurrency()));
        Self { state, info, semaphore }
    }
}

impl ServerHandler for NewsMcpServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move { Ok(ListToolsResult::with_all_items(tools::tool_catalog())) }
    }

    fn get_info(&self) -> ServerInfo { self.info.clone() }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let state = self.state.clone();
        let ct = context.ct.clone();
        let permits = self.semaphore.clone();
        async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|err| McpError::internal_error(
                    "failed to acquire concurrency permit",
                    Some(json!({ "reason": err.to_string() })),
                ))?;
            tracing::debug!(target = "news::mcp", tool = %request.name, "tool call");
            tools::handle_call(&state, &ct, request).await
        }
    }
}

/// One fresh handler per HTTP session, all sharing the same state and limit.
pub fn http_service(server: NewsMcpServer) -> StreamableHttpService<NewsMcpServer, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    )
}

pub async fn run_stdio(server: NewsMcpServer) -> Result<()> {
    tracing::info!(target = "news::mcp", "Starting rmcp server over stdio");
    let transport = (stdin(), stdout());
    let running = server
        .serve(transport)
        .await
        .context("failed to initialize MCP server")?;

    match running.waiting().await {
        Ok(QuitReason::Closed) => {
            tracing::info!(target = "news::mcp", "MCP transport closed by peer");
            Ok(())
        }
        Ok(QuitReason::Cancelled) => {
            tracing::info!(target = "news::mcp", "MCP server cancelled by request");
            Ok(())
        }
        Ok(QuitReason::JoinError(err)) => {
            tracing::error!(target = "news::mcp", error = %err, "MCP server task aborted");
            Err(err.into())
        }
        Err(err) => {
            tracing::error!(target = "news::mcp", error = %err, "MCP server join failure");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};

    #[test]
    fn info_advertises_tools_only() {
        let server = NewsMcpServer::new(AppState::new(Config::default()));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "news");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
    }

    #[test]
    fn concurrency_limit_follows_config() {
        let config = Config::default().with_overrides(&Overrides { max_concurrency: Some(3), ..Default::default() });
        let server = NewsMcpServer::new(AppState::new(config));
        assert_eq!(server.semaphore.available_permits(), 3);
    }
}
