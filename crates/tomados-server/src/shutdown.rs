//! Graceful shutdown coordination.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Coordinates shutdown between the signal listener and the accept loop
///
/// `shutdown()` tells the server to stop accepting connections;
/// `wait_for_shutdown()` blocks until the server reports completion or
/// the grace period elapses.
#[derive(Clone)]
pub struct ShutdownCoordinator {
	inner: Arc<Inner>,
}

struct Inner {
	shutdown_tx: broadcast::Sender<()>,
	complete_tx: watch::Sender<bool>,
	grace_period: Duration,
}

impl ShutdownCoordinator {
	pub fn new(grace_period: Duration) -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		let (complete_tx, _) = watch::channel(false);
		Self {
			inner: Arc::new(Inner {
				shutdown_tx,
				complete_tx,
				grace_period,
			}),
		}
	}

	/// Subscribe to the shutdown broadcast
	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.inner.shutdown_tx.subscribe()
	}

	/// Trigger shutdown
	pub fn shutdown(&self) {
		let _ = self.inner.shutdown_tx.send(());
	}

	/// Called by the server once it has stopped accepting connections
	pub fn notify_shutdown_complete(&self) {
		let _ = self.inner.complete_tx.send(true);
	}

	/// Wait for the server to finish, bounded by the grace period
	pub async fn wait_for_shutdown(&self) {
		let mut complete_rx = self.inner.complete_tx.subscribe();
		let _ = tokio::time::timeout(self.inner.grace_period, async {
			while !*complete_rx.borrow() {
				if complete_rx.changed().await.is_err() {
					break;
				}
			}
		})
		.await;
	}
}

/// Resolves when the process receives ctrl-c
pub async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
}
