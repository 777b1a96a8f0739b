//! Service lifecycle coordination - start a set of independent services,
//! watch for the first failure or a shutdown request, stop them all.
//!
//! This is a thin fan-out/fan-in companion to the error model, and its
//! principal consumer: every failure it surfaces is a [`ChainError`]. Each
//! service's `start` runs on its own task; the coordinator blocks on
//! whichever comes first of the caller-supplied cancellation future, an OS
//! shutdown request (SIGINT/SIGTERM), or the first reported start failure.
//! Failure reports go through a channel buffered to the service count, so a
//! background failure never blocks even while the coordinator is not yet
//! listening.
//!
//! There is no supervised restart and no stop timeout: a service whose
//! `stop` hangs will hang the coordinator, so services needing bounded
//! shutdown must enforce their own deadline.

use crate::{codes, BoxError, ChainError};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// A long-running unit managed by the [`ServiceManager`].
///
/// `start` is expected to block for the service's whole lifetime and return
/// only on failure or after `stop` was called. Both operations report
/// external errors; the coordinator converts them into chain-model errors
/// before surfacing them.
#[async_trait]
pub trait Service: Send + Sync {
    /// Run the service until it fails or is stopped.
    async fn start(&self) -> Result<(), BoxError>;

    /// Ask the service to shut down gracefully, unblocking `start`.
    async fn stop(&self) -> Result<(), BoxError>;
}

/// Coordinates startup and shutdown of a set of independent services.
pub struct ServiceManager {
    services: Vec<Arc<dyn Service>>,
}

impl ServiceManager {
    /// Build a manager over the given services. Stop order follows the
    /// order of this vector.
    pub fn new(services: Vec<Arc<dyn Service>>) -> Self {
        Self { services }
    }

    /// Number of managed services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the manager has no services to run.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Run every service until the first start failure, the provided
    /// `shutdown` future resolves, or an OS shutdown signal arrives - then
    /// stop all services sequentially.
    ///
    /// The first stop failure aborts the stop phase and is returned as a
    /// chain-model error with public message `"failed to stop server"`;
    /// remaining services are not stopped. On the non-failing path every
    /// start task is awaited before returning, so no task outlives this
    /// call; a start failure observed while listening (or one that lost the
    /// race to a shutdown request) is returned after the stop phase.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<(), BoxError> {
        let (failure_tx, mut failure_rx) = mpsc::channel::<BoxError>(self.services.len().max(1));

        let mut starters = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let service = Arc::clone(service);
            let failure_tx = failure_tx.clone();
            starters.push(tokio::spawn(async move {
                if let Err(err) = service.start().await {
                    error!(error = %err, "service start failed");
                    let failure =
                        ChainError::new(err.to_string(), "server start failed", codes::INTERNAL_FAILURE);
                    // Buffered to the service count; never blocks.
                    let _ = failure_tx.send(Box::new(failure) as BoxError).await;
                }
            }));
        }
        drop(failure_tx);
        info!(services = self.services.len(), "service manager running");

        let mut first_failure: Option<BoxError> = None;
        tokio::select! {
            _ = shutdown => {
                info!("shutdown requested, stopping services");
            }
            _ = os_shutdown_request() => {
                info!("shutdown signal received, stopping services");
            }
            failure = failure_rx.recv() => {
                // `None` means every start returned cleanly on its own.
                if let Some(failure) = failure {
                    first_failure = Some(failure);
                }
            }
        }

        for service in &self.services {
            if let Err(err) = service.stop().await {
                error!(error = %err, "service stop failed");
                return Err(Box::new(ChainError::new(
                    err.to_string(),
                    "failed to stop server",
                    codes::INTERNAL_FAILURE,
                )));
            }
        }

        for starter in starters {
            let _ = starter.await;
        }
        info!("service manager stopped");

        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

#[cfg(unix)]
async fn os_shutdown_request() {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::warn;

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable, listening for ctrl-c only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn os_shutdown_request() {
    let _ = tokio::signal::ctrl_c().await;
}
