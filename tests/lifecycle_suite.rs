//! Integration tests for the service lifecycle coordinator.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use trellis_core::{codes, matches_code, public_message, BoxError, Service, ServiceManager};

/// A managed unit that blocks in `start` until `stop` is called.
struct Unit {
    started: AtomicBool,
    stopped: AtomicBool,
    fail_start: bool,
    fail_stop: bool,
    release: Notify,
}

impl Unit {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            fail_start: false,
            fail_stop: false,
            release: Notify::new(),
        })
    }

    fn failing_start() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            fail_start: true,
            fail_stop: false,
            release: Notify::new(),
        })
    }

    fn failing_stop() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            fail_start: false,
            fail_stop: true,
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl Service for Unit {
    async fn start(&self) -> Result<(), BoxError> {
        self.started.store(true, Ordering::SeqCst);
        if self.fail_start {
            return Err("listener refused to bind".into());
        }
        self.release.notified().await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.stopped.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a start that has not yet reached
        // its wait still gets released.
        self.release.notify_one();
        if self.fail_stop {
            return Err("drain deadline exceeded".into());
        }
        Ok(())
    }
}

#[tokio::test]
async fn clean_shutdown_stops_every_service() {
    let a = Unit::new();
    let b = Unit::new();
    let manager = ServiceManager::new(vec![a.clone() as Arc<dyn Service>, b.clone()]);

    let result = manager
        .run(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        })
        .await;

    assert!(result.is_ok());
    assert!(a.started.load(Ordering::SeqCst) && b.started.load(Ordering::SeqCst));
    assert!(a.stopped.load(Ordering::SeqCst) && b.stopped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stop_failure_surfaces_as_chain_error() {
    let a = Unit::new();
    let b = Unit::failing_stop();
    let manager = ServiceManager::new(vec![a.clone() as Arc<dyn Service>, b.clone()]);

    let err = manager
        .run(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        })
        .await
        .unwrap_err();

    assert_eq!(public_message(Some(&*err)), "failed to stop server");
    assert!(matches_code(Some(&*err), codes::INTERNAL_FAILURE));
    assert!(a.stopped.load(Ordering::SeqCst), "unit A was never stopped");
    assert!(b.stopped.load(Ordering::SeqCst), "unit B was never stopped");
}

#[tokio::test]
async fn first_start_failure_triggers_shutdown() {
    let healthy = Unit::new();
    let broken = Unit::failing_start();
    let manager = ServiceManager::new(vec![healthy.clone() as Arc<dyn Service>, broken.clone()]);

    // No external shutdown: the failure alone must end the run.
    let err = manager.run(std::future::pending()).await.unwrap_err();

    assert_eq!(public_message(Some(&*err)), "server start failed");
    assert!(matches_code(Some(&*err), codes::INTERNAL_FAILURE));
    assert!(healthy.stopped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn start_failure_text_is_preserved_internally() {
    let broken = Unit::failing_start();
    let manager = ServiceManager::new(vec![broken.clone() as Arc<dyn Service>]);

    let err = manager.run(std::future::pending()).await.unwrap_err();
    assert!(err.to_string().contains("listener refused to bind"));
}
