//! HTTP server facade: Axum router assembly, error mapping, and the
//! uniform response envelope.

use anyhow::Context;
use axum::{routing::get, Router};

use bookstore_kernel::ModuleRegistry;

pub mod error;
pub mod response;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
///
/// Serves until a shutdown signal arrives, then returns so the caller can
/// run module teardown.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &bookstore_kernel::settings::Settings,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings).context("failed to build HTTP router")?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &bookstore_kernel::settings::Settings,
) -> anyhow::Result<Router> {
    let mut router_builder = RouterBuilder::new();

    // Root welcome route listing mounted module endpoints
    let endpoints: serde_json::Map<String, serde_json::Value> = registry
        .modules()
        .iter()
        .map(|module| {
            (
                module.name().to_string(),
                serde_json::Value::String(format!("/api/{}", module.name())),
            )
        })
        .collect();
    let welcome = serde_json::json!({
        "message": "Welcome to the Bookstore API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    });
    router_builder = router_builder.route(
        "/",
        get(move || async move { axum::Json(welcome.clone()) }),
    );

    // Mount module routes
    for module in registry.modules() {
        let module_name = module.name();

        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    // Middleware wraps the routes registered above
    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    router_builder = router_builder.with_openapi(registry).with_fallback();

    Ok(router_builder.build())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
