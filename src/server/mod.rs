//! HTTP transport for the item store
//!
//! Thin axum layer: routes map one-to-one onto `SharedStore` operations.
//! On an orderly termination signal the server stops accepting requests,
//! drains in-flight ones, and then shuts the store down, which writes the
//! snapshot.

mod api;
mod handlers;
mod types;

pub use api::build_router;
pub use handlers::ApiError;
pub use types::{CountResponse, ErrorResponse, TextBody};

use crate::store::SharedStore;
use eyre::{Context, Result, eyre};
use log::{error, info};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server owning a handle to the store
pub struct ItemServer {
    store: Arc<SharedStore>,
    addr: String,
}

impl ItemServer {
    pub fn new(store: Arc<SharedStore>, addr: impl Into<String>) -> Self {
        Self {
            store,
            addr: addr.into(),
        }
    }

    /// Serve until `shutdown` resolves, then save the snapshot.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        info!("Listening on {}", listener.local_addr()?);

        let served = axum::serve(listener, build_router(self.store.clone()))
            .with_graceful_shutdown(shutdown)
            .await;

        self.finish(served)
    }

    /// Shut the store down whatever way serving ended, and report both failures.
    fn finish(&self, served: std::io::Result<()>) -> Result<()> {
        match &served {
            Ok(()) => info!("Server stopped, saving snapshot"),
            Err(e) => error!("Server failed: {}, saving snapshot anyway", e),
        }

        let path = self.store.snapshot_path().display();
        match (served, self.store.shutdown()) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => Err(e).context("HTTP server failed"),
            (Ok(()), Err(e)) => Err(e).with_context(|| format!("Failed to save snapshot to {}", path)),
            (Err(serve_err), Err(save_err)) => Err(eyre!(
                "HTTP server failed: {}; failed to save snapshot to {}: {}",
                serve_err,
                path,
                save_err
            )),
        }
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
