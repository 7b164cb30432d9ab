// src/core/retention.rs
//! Periodic expiry of staged artifacts.

use crate::core::artifact_store::ArtifactStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Remove everything older than `ttl` once; returns how many artifacts went.
pub async fn sweep_once(store: &dyn ArtifactStore, ttl: Duration) -> usize {
    match store.remove_older_than(ttl).await {
        Ok(0) => {
            debug!("Retention sweep: nothing expired");
            0
        }
        Ok(removed) => {
            info!("Retention sweep removed {} artifact(s)", removed);
            removed
        }
        Err(e) => {
            warn!("Retention sweep failed: {}", e);
            0
        }
    }
}

pub fn spawn_retention_sweeper(
    store: Arc<dyn ArtifactStore>,
    ttl: Duration,
    every: Duration,
) -> JoinHandle<()> {
    info!(
        "Retention sweeper: ttl {}s, every {}s",
        ttl.as_secs(),
        every.as_secs()
    );
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            sweep_once(store.as_ref(), ttl).await;
        }
    })
}
