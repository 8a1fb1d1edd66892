#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod cors;
mod health;
mod root;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use toolchat_agent::Orchestrator;
use toolchat_config::{Config, DEFAULT_LISTEN_ADDRESS};
use toolchat_llm::{CompletionService, OpenAiCompletionClient};
use toolchat_tools::ToolRegistry;
use toolchat_tools::builtin::register_builtin_tools;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Registers the enabled built-in tools, connects the completion client
    /// and mounts every route.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS);

        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, &config.tools);
        let registry = Arc::new(registry);

        let client = OpenAiCompletionClient::new(&config.llm)?;
        tracing::info!(
            model = %client.model(),
            base_url = %config.llm.base_url,
            tools = registry.len(),
            "agent initialized"
        );
        let completion: Arc<dyn CompletionService> = Arc::new(client);

        let mut orchestrator = Orchestrator::new(completion, Arc::clone(&registry));
        if let Some(ref instruction) = config.llm.summary_instruction {
            orchestrator = orchestrator.with_summary_instruction(instruction.clone());
        }

        let mut app = Router::new().route("/", get(root::root_handler));

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        app = app.merge(toolchat_tools::tools_router(registry));
        app = app.merge(toolchat_agent::agent_router(Arc::new(orchestrator)));

        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Override the listen address
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
