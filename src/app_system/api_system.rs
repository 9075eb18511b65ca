use tracing::{error, info, instrument};

use crate::clients::StoreClient;
use crate::store::UserStore;

/// The application system: starts the store actor, hands out its client, and
/// shuts everything down in order.
pub struct ApiSystem {
    pub store_client: StoreClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for ApiSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiSystem {
    #[instrument(name = "api_system")]
    pub fn new() -> Self {
        info!("Starting api system");

        let (store, store_client) = UserStore::new(100);
        let handles = vec![tokio::spawn(store.run())];

        info!("Api system started successfully");

        Self {
            store_client,
            handles,
        }
    }

    /// Gracefully shut down: ask the store to stop, then wait for its task.
    ///
    /// Errors are logged but do not abort the shutdown, to prevent hangs.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> anyhow::Result<()> {
        info!("Shutting down api system");

        let _ = self.store_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Store task shutdown error");
            }
        }

        info!("Api system shutdown complete");
        Ok(())
    }
}
