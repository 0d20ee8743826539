use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::application::{DashboardOptions, IdAllocation};
use crate::domain::TransitionPolicy;

/// Process configuration: built-in defaults, then an optional
/// `dashboard.toml`, then `DASHBOARD__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub repository: RepositoryConfig,
    pub roadmap: RoadmapConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub data_dir: PathBuf,
    pub redis_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub database_url: Option<String>,
    pub probe_timeout_ms: u64,
    pub live_sync: bool,
}

impl RemoteConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub id_allocation: IdAllocation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapConfig {
    pub transitions: TransitionPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("dashboard").required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a TOML document
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("storage.kind", "file")?
            .set_default("storage.data_dir", "./data")?
            .set_default("remote.probe_timeout_ms", 2000)?
            .set_default("remote.live_sync", true)?
            .set_default("repository.id_allocation", "monotonic")?
            .set_default("roadmap.transitions", "enforced")
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            id_allocation: self.repository.id_allocation,
            transitions: self.roadmap.transitions,
            live_sync: self.remote.live_sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.storage.kind, StorageKind::File);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.storage.redis_url, None);
        assert_eq!(config.remote.database_url, None);
        assert_eq!(config.remote.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.dashboard_options(), DashboardOptions::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [storage]
            kind = "redis"
            redis_url = "redis://localhost:6379"

            [remote]
            database_url = "postgres://localhost/sitebook"
            live_sync = false

            [repository]
            id_allocation = "length"

            [roadmap]
            transitions = "permissive"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.kind, StorageKind::Redis);
        assert_eq!(config.storage.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.remote.database_url.as_deref(), Some("postgres://localhost/sitebook"));

        let options = config.dashboard_options();
        assert_eq!(options.id_allocation, IdAllocation::Length);
        assert_eq!(options.transitions, TransitionPolicy::Permissive);
        assert!(!options.live_sync);
    }

    #[test]
    fn test_unknown_storage_kind_is_rejected() {
        let result = AppConfig::from_toml("[storage]\nkind = \"floppy\"");
        assert!(result.is_err());
    }
}
