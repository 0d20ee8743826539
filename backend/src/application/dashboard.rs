use std::sync::Arc;

use tracing::{info, warn};

use crate::application::notification_bus::NotificationBus;
use crate::application::ports::{BackendMode, PersistenceBackend};
use crate::application::projects::ProjectRepository;
use crate::application::recruitment::ApplicationRepository;
use crate::application::remote_sync::{RemoteSync, SyncHandle};
use crate::application::repository::{EntityRepository, IdAllocation, Record};
use crate::application::roadmap::RoadmapService;
use crate::application::seed;
use crate::application::store::CollectionStore;
use crate::application::users::UserRepository;
use crate::application::views::DashboardViews;
use crate::domain::TransitionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub id_allocation: IdAllocation,
    pub transitions: TransitionPolicy,
    /// Follow remote changes when the remote backend is in use
    pub live_sync: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            id_allocation: IdAllocation::default(),
            transitions: TransitionPolicy::default(),
            live_sync: true,
        }
    }
}

/// Everything the views need, built once per process and handed to them
/// explicitly.
pub struct Dashboard {
    bus: Arc<NotificationBus>,
    projects: Arc<ProjectRepository>,
    users: Arc<UserRepository>,
    applications: Arc<ApplicationRepository>,
    roadmap: RoadmapService,
    views: DashboardViews,
    mode: BackendMode,
    sync_handles: Vec<SyncHandle>,
}

impl Dashboard {
    pub async fn open(backend: Arc<dyn PersistenceBackend>, options: DashboardOptions) -> Self {
        let mode = backend.mode();
        let remote = backend.remote();
        let store = Arc::new(CollectionStore::new(backend));
        let bus = Arc::new(NotificationBus::new());
        let allocation = options.id_allocation;
        if mode == BackendMode::Remote && allocation == IdAllocation::Length {
            warn!("length id allocation can reuse ids; clashing inserts are rejected by the remote database");
        }

        let projects = Arc::new(
            EntityRepository::load(store.clone(), bus.clone(), seed::projects(), allocation).await,
        );
        let users =
            Arc::new(EntityRepository::load(store.clone(), bus.clone(), seed::users(), allocation).await);
        let applications = Arc::new(
            EntityRepository::load(store, bus.clone(), seed::applications(), allocation).await,
        );

        let mut sync_handles = Vec::new();
        if let (true, Some(remote)) = (options.live_sync, remote) {
            let sync = RemoteSync::new(remote);
            sync_handles.extend(follow(&projects, &sync).await);
            sync_handles.extend(follow(&users, &sync).await);
            sync_handles.extend(follow(&applications, &sync).await);
        }

        info!(
            ?mode,
            transitions = ?options.transitions,
            id_allocation = ?allocation,
            live_collections = sync_handles.len(),
            "dashboard ready"
        );

        Self {
            roadmap: RoadmapService::new(projects.clone(), options.transitions),
            views: DashboardViews::new(projects.clone(), users.clone(), applications.clone()),
            bus,
            projects,
            users,
            applications,
            mode,
            sync_handles,
        }
    }

    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    pub fn projects(&self) -> &Arc<ProjectRepository> {
        &self.projects
    }

    pub fn users(&self) -> &Arc<UserRepository> {
        &self.users
    }

    pub fn applications(&self) -> &Arc<ApplicationRepository> {
        &self.applications
    }

    pub fn roadmap(&self) -> &RoadmapService {
        &self.roadmap
    }

    pub fn views(&self) -> &DashboardViews {
        &self.views
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.sync_handles.iter().any(SyncHandle::is_active)
    }

    /// Stops remote delivery; local state stays as last seen
    pub fn stop_sync(&mut self) {
        self.sync_handles.clear();
    }
}

async fn follow<T: Record>(repo: &Arc<EntityRepository<T>>, sync: &RemoteSync) -> Option<SyncHandle> {
    match repo.follow_remote(sync).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(collection = %T::COLLECTION, error = %e, "live sync unavailable, using loaded snapshot");
            None
        }
    }
}
