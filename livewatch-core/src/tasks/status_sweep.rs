// livewatch-core/src/tasks/status_sweep.rs

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info};

use crate::config::SweepConfig;
use crate::services::{Reconciler, SweepReport};

/// Spawns the periodic reconciliation task.
///
/// Waits `initial_delay`, sweeps once, then sweeps every `period`. Exits as
/// soon as `shutdown_rx` turns `true` or its sender is dropped.
pub fn spawn_status_sweep_task(
    reconciler: Arc<Reconciler>,
    config: SweepConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = sleep(config.initial_delay) => {}
            _ = stop_signaled(&mut shutdown_rx) => {
                info!("Shutdown signaled before first status sweep.");
                return;
            }
        }

        let mut ticker = interval(config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    run_tick(&reconciler).await;
                }
                _ = stop_signaled(&mut shutdown_rx) => {
                    info!("Shutdown signaled; stopping status sweep task.");
                    break;
                }
            }
        }
    })
}

/// Resolves once shutdown is requested or the sender is gone. The watch
/// guard is released here so it never lives across a sweep.
async fn stop_signaled(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

/// Runs one sweep and logs a failure. The next tick starts over.
pub async fn run_tick(reconciler: &Reconciler) -> Option<SweepReport> {
    match reconciler.sweep().await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Status sweep failed: {:?}", e);
            None
        }
    }
}
