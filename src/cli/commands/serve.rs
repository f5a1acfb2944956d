//! Serve command - run the HTTP API.

use crate::app::AppContext;
use crate::cli::Output;
use crate::config::Settings;
use crate::server;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Initialize the application, then bind and serve.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);

    let (context, listener) =
        match bind_after_init(|| AppContext::from_env(&settings), &addr).await {
            Ok(bound) => bound,
            Err(e) => {
                Output::error(&format!("Startup failed: {}", e));
                Output::info("Run 'codemap doctor' for detailed diagnostics.");
                return Err(e);
            }
        };
    info!("Listening on {}", addr);

    Output::header("Codemap API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Roadmap", "GET  /roadmap/{topic}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(listener, Arc::new(context)).await?;

    Ok(())
}

/// Run `init`, and bind `addr` only once it has succeeded.
async fn bind_after_init<F>(init: F, addr: &str) -> anyhow::Result<(AppContext, TcpListener)>
where
    F: FnOnce() -> crate::Result<AppContext>,
{
    let context = init()?;
    let listener = TcpListener::bind(addr).await?;
    Ok((context, listener))
}
