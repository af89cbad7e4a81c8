//! Per-invocation wiring of config, storage, backend and queue.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::backend::{ApiClient, BackendProcessor, DeliveredAnalysis};
use crate::config::{Config, Paths};
use crate::error::AthenaError;
use crate::offline::{
    ConnectivityMonitor, ConnectivityState, DrainSummary, ManagerOptions, OfflineManager,
};
use crate::storage::SqliteBlobStore;

/// Resolve the data directory and load its config.
///
/// `api_url` replaces `api.base_url` when given.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the config
/// file cannot be parsed.
pub fn load_config(
    home: Option<PathBuf>,
    api_url: Option<String>,
) -> Result<(Paths, Config), AthenaError> {
    let paths = match home {
        Some(root) => Paths::with_root(root),
        None => Paths::new()?,
    };
    paths.ensure_dirs()?;

    let mut config = Config::load_from_path(&paths.config_file)?;
    if let Some(url) = api_url {
        config.api.base_url = url;
    }

    Ok((paths, config))
}

/// Everything a command needs to work with the queue.
pub struct Session {
    pub config: Config,
    pub manager: OfflineManager,
    client: ApiClient,
    monitor: ConnectivityMonitor,
    results: Mutex<mpsc::UnboundedReceiver<DeliveredAnalysis>>,
    offline: bool,
}

impl Session {
    /// Open the queue database and load the persisted queue.
    ///
    /// The manager starts offline so enqueueing never spawns a detached
    /// drain; [`Session::deliver`] runs the pass in the foreground.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the HTTP
    /// client cannot be built.
    pub async fn open(paths: &Paths, config: Config, offline: bool) -> Result<Self, AthenaError> {
        let store = SqliteBlobStore::open_at(&paths.database)?;
        let client = ApiClient::from_config(&config.api)?;
        let (results_tx, results) = mpsc::unbounded_channel();
        let processor = BackendProcessor::new(client.clone()).with_results(results_tx);
        let monitor = ConnectivityMonitor::new(ConnectivityState::OFFLINE);

        let manager = OfflineManager::load(
            Arc::new(store),
            Arc::new(processor),
            monitor.subscribe(),
            ManagerOptions::from(&config.queue),
        )
        .await;

        debug!(database = %paths.database.display(), offline, "Session opened");

        Ok(Self {
            config,
            manager,
            client,
            monitor,
            results: Mutex::new(results),
            offline,
        })
    }

    /// Drain the queue now unless running with `--offline`.
    pub async fn deliver(&self) -> Option<DrainSummary> {
        if self.offline {
            return None;
        }
        self.monitor.set_online(true);
        self.manager.retry_all().await
    }

    /// Verdicts for analyses delivered since the last call.
    pub async fn take_analyses(&self) -> Vec<DeliveredAnalysis> {
        let mut results = self.results.lock().await;
        let mut delivered = Vec::new();
        while let Ok(analysis) = results.try_recv() {
            delivered.push(analysis);
        }
        delivered
    }

    /// Backend client for direct reads.
    ///
    /// # Errors
    ///
    /// Returns `AthenaError::Network` when running with `--offline`.
    pub fn client(&self) -> Result<&ApiClient, AthenaError> {
        if self.offline {
            return Err(AthenaError::Network(
                "Offline mode; the backend was not contacted".to_string(),
            ));
        }
        Ok(&self.client)
    }
}
