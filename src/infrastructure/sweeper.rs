// src/infrastructure/sweeper.rs
use crate::application::services::ApplicationServices;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};

/// Periodically evict expired states, codes and refresh tokens.
pub fn spawn_expiry_sweeper(
    services: Arc<ApplicationServices>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        tracing::info!(period_secs = period.as_secs(), "expiry sweeper started");

        loop {
            ticker.tick().await;

            match services.purge_expired().await {
                Ok(report) => {
                    if report.total() > 0 {
                        tracing::info!(
                            states = report.states,
                            codes = report.codes,
                            refresh_tokens = report.refresh_tokens,
                            "purged expired link records"
                        );
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "expiry sweep failed");
                }
            }
        }
    })
}
