use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use crate::application::ports::{KeyValueStore, PersistenceBackend, RemoteDatabase};
use crate::application::Dashboard;
use crate::infrastructure::config::{AppConfig, RemoteConfig, StorageConfig, StorageKind};
use crate::infrastructure::driven::persistence::{
    FileKeyValueStore, InMemoryKeyValueStore, LocalBackend, PostgresRemoteDatabase, RedisKeyValueStore,
    RemoteBackend,
};

/// Probes the remote database once. Anything but a timely successful ping
/// selects the local store for the rest of the process.
pub async fn select_backend(
    remote: Option<Arc<dyn RemoteDatabase>>,
    local: Arc<dyn KeyValueStore>,
    probe_timeout: Duration,
) -> Arc<dyn PersistenceBackend> {
    let Some(remote) = remote else {
        info!("no remote database configured, using local storage");
        return Arc::new(LocalBackend::new(local));
    };

    match tokio::time::timeout(probe_timeout, remote.ping()).await {
        Ok(Ok(())) => {
            info!("remote database reachable, using remote persistence");
            return Arc::new(RemoteBackend::new(remote));
        }
        Ok(Err(e)) => warn!(error = %e, "remote database unavailable, falling back to local storage"),
        Err(_) => warn!(
            timeout_ms = probe_timeout.as_millis() as u64,
            "remote database probe timed out, falling back to local storage"
        ),
    }
    Arc::new(LocalBackend::new(local))
}

pub async fn build_local_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.kind {
        StorageKind::File => {
            let store = FileKeyValueStore::open(&config.data_dir)
                .await
                .with_context(|| format!("failed to prepare data directory {}", config.data_dir.display()))?;
            Arc::new(store)
        }
        StorageKind::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("storage.redis_url is required for redis storage")?;
            let client = redis::Client::open(url).context("invalid redis url")?;
            Arc::new(RedisKeyValueStore::new(client))
        }
        StorageKind::Memory => Arc::new(InMemoryKeyValueStore::new()),
    };
    Ok(store)
}

/// `None` when no URL is configured or the database cannot be reached
pub async fn connect_remote(config: &RemoteConfig) -> Option<Arc<dyn RemoteDatabase>> {
    let url = config.database_url.as_deref()?;

    let database = match PostgresRemoteDatabase::connect(url, config.probe_timeout()).await {
        Ok(database) => database,
        Err(e) => {
            warn!(error = %e, "could not connect to remote database");
            return None;
        }
    };

    if let Err(e) = database.ensure_schema().await {
        warn!(error = %e, "remote database schema unavailable");
        return None;
    }
    Some(Arc::new(database))
}

pub async fn start(config: &AppConfig) -> anyhow::Result<Dashboard> {
    let local = build_local_store(&config.storage).await?;
    let remote = connect_remote(&config.remote).await;
    let backend = select_backend(remote, local, config.remote.probe_timeout()).await;

    Ok(Dashboard::open(backend, config.dashboard_options()).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::BackendMode;
    use crate::domain::PhaseStatus;
    use crate::infrastructure::driven::persistence::InMemoryRemoteDatabase;

    const PROBE: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_reachable_remote_is_selected() {
        let remote: Arc<dyn RemoteDatabase> = Arc::new(InMemoryRemoteDatabase::new());
        let backend = select_backend(Some(remote), Arc::new(InMemoryKeyValueStore::new()), PROBE).await;

        assert_eq!(backend.mode(), BackendMode::Remote);
        assert!(backend.remote().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_local() {
        let offline = InMemoryRemoteDatabase::new();
        offline.set_available(false);
        let remote: Arc<dyn RemoteDatabase> = Arc::new(offline);

        let backend = select_backend(Some(remote), Arc::new(InMemoryKeyValueStore::new()), PROBE).await;

        assert_eq!(backend.mode(), BackendMode::Local);
        assert!(backend.remote().is_none());
    }

    #[tokio::test]
    async fn test_missing_remote_uses_local() {
        let backend = select_backend(None, Arc::new(InMemoryKeyValueStore::new()), PROBE).await;
        assert_eq!(backend.mode(), BackendMode::Local);
    }

    #[tokio::test]
    async fn test_start_with_memory_storage_serves_seed_data() {
        let config = AppConfig::from_toml("[storage]\nkind = \"memory\"").unwrap();
        let dashboard = start(&config).await.unwrap();

        assert_eq!(dashboard.mode(), BackendMode::Local);
        assert!(!dashboard.is_live());
        assert_eq!(dashboard.projects().len(), 2);
        assert_eq!(dashboard.users().len(), 4);
    }

    #[tokio::test]
    async fn test_file_storage_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[storage]\nkind = \"file\"\ndata_dir = {:?}",
            dir.path().to_string_lossy()
        );
        let config = AppConfig::from_toml(&toml).unwrap();

        {
            let dashboard = start(&config).await.unwrap();
            let id = dashboard.projects().list()[1].id.clone();
            let moved = dashboard
                .roadmap()
                .set_phase_status(&id, "Foundation", PhaseStatus::Active)
                .await;
            assert!(moved);
        }

        let dashboard = start(&config).await.unwrap();
        let project = &dashboard.projects().list()[1];
        let foundation = project.roadmap.step("Foundation").map(|step| step.status);
        assert_eq!(foundation, Some(PhaseStatus::Active));
    }

    #[tokio::test]
    async fn test_redis_storage_requires_url() {
        let config = AppConfig::from_toml("[storage]\nkind = \"redis\"").unwrap();
        assert!(build_local_store(&config.storage).await.is_err());
    }
}
