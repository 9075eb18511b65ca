//! TCP accept loop and hyper connection serving.
//!
//! Each accepted connection runs on its own task, so any number of requests
//! can be in flight at once; the store actor is what serializes state access.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::api;
use crate::clients::StoreClient;

/// Transport-boundary limit on waiting for request headers. It also bounds
/// keep-alive idle gaps between requests on a connection. Nothing here
/// propagates into handlers or the store.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to a running server that can be used to stop it.
pub struct ServerHandle {
    shutdown_tx: oneshot::Sender<()>,
    addr: SocketAddr,
}

impl ServerHandle {
    /// The address the listener actually bound (port 0 resolves here).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections. In-flight connections finish on their own
    /// tasks.
    pub fn stop(self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Bind the listener and start serving in the background.
pub async fn start(host: &str, port: u16, store: StoreClient) -> anyhow::Result<ServerHandle> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "Server listening");

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Server shutting down");
                    break;
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            let io = TokioIo::new(stream);
                            let store = store.clone();

                            tokio::spawn(async move {
                                let service = service_fn(move |req| {
                                    let store = store.clone();
                                    async move {
                                        Ok::<_, Infallible>(api::handle_request(store, req).await)
                                    }
                                });

                                if let Err(err) = http1::Builder::new()
                                    .timer(TokioTimer::new())
                                    .header_read_timeout(HEADER_READ_TIMEOUT)
                                    .serve_connection(io, service)
                                    .await
                                {
                                    error!(error = %err, "Error serving connection");
                                }
                            });
                        }
                        Err(err) => {
                            error!(error = %err, "Failed to accept connection");
                        }
                    }
                }
            }
        }
    });

    Ok(ServerHandle {
        shutdown_tx,
        addr: local_addr,
    })
}
