use std::net::SocketAddr;
use std::sync::Arc;
use axum_server::{Handle, Server};
use tokio::sync::watch;
use tracing::{error, info, warn};

use livewatch_core::platforms::twitch_eventsub::webhook_router;
use livewatch_core::tasks::spawn_status_sweep_task;
use livewatch_core::Error;

use crate::context::ServerContext;
use crate::Args;

/// Runs the webhook server and the sweep task until Ctrl-C.
pub async fn run_server(args: Args) -> Result<(), Error> {
    let ctx = ServerContext::connect(&args).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 1) Periodic sweep
    let sweep_handle = match ctx.reconciler() {
        Ok(reconciler) => {
            info!(
                "Status sweep every {:?}, first run in {:?}",
                ctx.sweep_config.period, ctx.sweep_config.initial_delay
            );
            Some(spawn_status_sweep_task(
                Arc::new(reconciler),
                ctx.sweep_config,
                shutdown_rx.clone(),
            ))
        }
        Err(e) => {
            warn!("Status sweep disabled: {}", e);
            None
        }
    };

    // 2) Webhook endpoint
    let app = webhook_router(Arc::new(ctx.webhook_gateway()));
    let addr: SocketAddr = args.server_addr.parse()?;
    info!("Webhook server listening on http://{}", addr);

    let handle = Handle::new();
    let handle_clone = handle.clone();
    let mut server_shutdown_rx = shutdown_rx.clone();
    tokio::spawn(async move {
        let _ = server_shutdown_rx.wait_for(|stop| *stop).await;
        handle_clone.graceful_shutdown(None);
    });

    // 3) Ctrl-C => signal
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
        }
        info!("Ctrl-C detected; shutting down...");
        let _ = shutdown_tx.send(true);
    });

    Server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    info!("Webhook server shut down.");

    if let Some(h) = sweep_handle {
        if let Err(e) = h.await {
            error!("Status sweep task ended abnormally: {:?}", e);
        }
    }
    info!("Server shutdown complete.");
    Ok(())
}
